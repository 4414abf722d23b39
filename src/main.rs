// Entry point and interactive CLI flow.
//
// - Option [1] (re)loads and normalizes the CSV, printing diagnostics.
// - Options [2]/[3] change the product and country selection.
// - Option [4] derives every table for the current selection, exports them
//   and prints previews; afterwards the user can go back to the menu or exit.
use fuel_report::aggregate::FilterRequest;
use fuel_report::config::{parse_country_list, Config};
use fuel_report::dataset::DatasetCache;
use fuel_report::output::preview_table_rows;
use fuel_report::reports::{self, Report};
use fuel_report::types::KpiRow;
use fuel_report::util;
use log::error;
use std::io::{self, Write};

/// Everything the menu works on. The dataset is loaded lazily and only
/// replaced by an explicit reload.
struct App {
    config: Config,
    cache: DatasetCache,
    product: String,
    countries: Option<Vec<String>>,
}

impl App {
    fn new(config: Config) -> Self {
        App {
            cache: DatasetCache::new(&config.source),
            product: config.product.clone(),
            countries: config.countries.clone(),
            config,
        }
    }

    fn request(&self) -> FilterRequest {
        let req = FilterRequest::new(self.product.as_str());
        match &self.countries {
            Some(list) => req.countries(list.iter().cloned()),
            None => req,
        }
    }
}

/// Print `label` and read one trimmed line from stdin.
fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    prompt("Enter choice: ")
}

/// Loops until `Y` (back to the menu) or `N` (quit).
fn prompt_back_to_menu() -> bool {
    loop {
        match prompt("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(app: &mut App) {
    let source = app.cache.path().display().to_string();
    match app.cache.reload() {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows read, {} records loaded)",
                util::format_int(report.total_rows),
                util::format_int(report.loaded_rows)
            );
            if report.skipped_rows > 0 {
                println!(
                    "Note: {} rows skipped (undecodable or missing country/product).",
                    util::format_int(report.skipped_rows)
                );
            }
            println!(
                "Info: {} unparsable dates and {} unparsable prices kept as empty.",
                util::format_int(report.null_dates),
                util::format_int(report.null_prices)
            );
            if !report.unmapped_countries.is_empty() {
                println!(
                    "Info: no map code for {}.",
                    report.unmapped_countries.join(", ")
                );
            }
            println!("Products: {}\n", data.products().join(", "));
        }
        Err(e) if e.is_no_data() => {
            println!("No data to render: {}\n", e);
        }
        Err(e) => {
            error!("Failed to load {}: {}", source, e);
        }
    }
}

fn handle_select_product(app: &mut App) {
    let products = match app.cache.get_or_load() {
        Ok((data, _)) => data.products(),
        Err(e) => {
            println!("No data to render: {}\n", e);
            return;
        }
    };
    for (i, p) in products.iter().enumerate() {
        println!("[{}] {}", i + 1, p);
    }
    let choice = read_choice();
    match choice.parse::<usize>().ok().and_then(|i| products.get(i.wrapping_sub(1))) {
        Some(p) => {
            app.product = p.clone();
            println!("Product set to {}.\n", app.product);
        }
        None => println!("Invalid choice. Product unchanged ({}).\n", app.product),
    }
}

fn handle_select_countries(app: &mut App) {
    if let Ok((data, _)) = app.cache.get_or_load() {
        println!("Available: {}", data.countries().join(", "));
    }
    let input = prompt("Countries (comma-separated, empty for all): ");
    let list = parse_country_list(&input);
    if list.is_empty() {
        app.countries = None;
        println!("Showing all countries.\n");
    } else {
        println!("Showing {}.\n", list.join(", "));
        app.countries = Some(list);
    }
}

fn handle_generate_reports(app: &App) {
    let data = match app.cache.get_or_load() {
        Ok((data, _)) => data,
        Err(e) => {
            println!("No data to render: {}\n", e);
            return;
        }
    };
    let request = app.request();
    let report = Report::build(data, &request, app.config.top_n);
    if report.is_empty() {
        println!("No prices found for product {:?}.\n", app.product);
        return;
    }

    println!("Generating reports for {}...\n", app.product);
    match report.write_all(data, &request, &app.config.output_dir) {
        Ok(paths) => println!("{} files saved to {}\n", paths.len(), app.config.output_dir.display()),
        Err(e) => error!("Write error: {}", e),
    }

    println!("Country Comparison (mean price, % of mean of means)\n");
    preview_table_rows(&report.comparison, 10);
    println!("(Full table exported to {})\n", reports::COMPARISON_FILE);

    println!("Monthly Heatmap\n");
    preview_table_rows(&report.heatmap, 6);
    println!("(Full table exported to {})\n", reports::HEATMAP_FILE);

    println!("Regional Trend\n");
    let tail = report.trend.len().saturating_sub(4);
    preview_table_rows(&report.trend[tail..], 4);
    println!("(Full table exported to {})\n", reports::TREND_FILE);

    println!("Top / Bottom {} Countries\n", app.config.top_n);
    preview_table_rows(&report.rankings, app.config.top_n * 2);

    if let Some(summary) = &report.summary {
        println!("KPI Summary ({}):\n", reports::SUMMARY_FILE);
        preview_table_rows(&[KpiRow::from(summary)], 1);
    }
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut app = App::new(Config::from_env());
    loop {
        println!("Fuel Price Report ({} | {})", app.product, app.cache.path().display());
        println!("[1] Load the file");
        println!("[2] Select product");
        println!("[3] Select countries");
        println!("[4] Generate Reports\n");
        match read_choice().as_str() {
            "1" => handle_load(&mut app),
            "2" => handle_select_product(&mut app),
            "3" => handle_select_countries(&mut app),
            "4" => {
                println!();
                handle_generate_reports(&app);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1-4.\n"),
        }
    }
}
