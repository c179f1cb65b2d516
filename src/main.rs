use clap::{App, Arg};
use log::LevelFilter;

use crossfill::{
    find_fill_with_options, load_font, load_grid_config, render_grid, render_image, FillOptions,
    ValueOrdering,
};

fn setup_logger(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn main() -> Result<(), String> {
    let matches = App::new("crossfill")
        .about("Fill a crossword grid from a word list")
        .arg(
            Arg::with_name("structure")
                .value_name("STRUCTURE")
                .help("Grid file: one line per row, `_` for open cells, anything else for blocks")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("words")
                .value_name("WORDS")
                .help("Word list file, one word per line")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("output")
                .value_name("OUTPUT")
                .help("Where to save the filled grid as an image, e.g. output.png")
                .index(3),
        )
        .arg(
            Arg::with_name("font")
                .long("font")
                .value_name("FONT")
                .takes_value(true)
                .help("TrueType font for the letters in OUTPUT; without it cells are left empty"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
        .arg(
            Arg::with_name("fixed-order")
                .long("fixed-order")
                .help("Try words in word list order instead of least-constraining first"),
        )
        .arg(
            Arg::with_name("inference")
                .long("inference")
                .help("Propagate each tentative word to crossing slots during search"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    setup_logger(level).map_err(|e| format!("Failed to set up logging: {}", e))?;

    let structure = matches.value_of("structure").ok_or("Missing grid file")?;
    let words = matches.value_of("words").ok_or("Missing word list")?;
    let grid_config = load_grid_config(structure, words).map_err(|e| e.to_string())?;

    let options = FillOptions {
        value_ordering: if matches.is_present("fixed-order") {
            ValueOrdering::Vocabulary
        } else {
            ValueOrdering::LeastConstraining
        },
        inference: matches.is_present("inference"),
    };

    match find_fill_with_options(&grid_config, options) {
        Ok(result) => {
            let display_grid = render_grid(&grid_config, &result.assignment);
            log::info!("{:?}", result.statistics);
            println!("{}", display_grid);

            if let Some(output) = matches.value_of("output") {
                let font = match matches.value_of("font") {
                    Some(path) => Some(load_font(path).map_err(|e| e.to_string())?),
                    None => {
                        log::warn!("No --font given; {} will have empty cells", output);
                        None
                    }
                };
                render_image(&grid_config, &result.assignment, font.as_ref(), output)
                    .map_err(|e| e.to_string())?;
                log::info!("Wrote filled grid to {}", output);
            }
        }
        Err(_) => println!("No solution."),
    }

    Ok(())
}
