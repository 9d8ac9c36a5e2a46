mod menu;

use common::config::load_config;
use common::PipelineReport;

const CONFIG_PATH: &str = "configs/pipeline_baseline.toml";

fn main() {
    env_logger::init();

    println!("===========================================");
    println!("Welcome to the Real-Time Chart Pipeline");
    println!("===========================================");

    loop {
        menu::show_menu();

        match menu::get_user_choice() {
            Ok(1) => run_threaded_demo(),
            Ok(2) => run_async_demo(),
            Ok(3) => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please select 1-3."),
        }
    }
}

fn run_threaded_demo() {
    println!("\n=== Running Threaded Pipeline Demo ===");

    let config = load_config(CONFIG_PATH).expect("Failed to load config");
    print_config(&config);

    let report = threaded_impl::run_pipeline(&config);
    display_report(&report);

    menu::wait_for_enter();
}

fn run_async_demo() {
    println!("\n=== Running Async Pipeline Demo ===");

    let config = load_config(CONFIG_PATH).expect("Failed to load config");
    print_config(&config);

    let rt = tokio::runtime::Runtime::new().unwrap();
    let report = rt.block_on(async_impl::run_pipeline(&config));
    display_report(&report);

    menu::wait_for_enter();
}

fn print_config(config: &common::PipelineConfig) {
    println!(
        "Configuration: {}: producer every {} ms, chart every {} ms, {} seconds",
        config.pipeline_name, config.producer_period_ms, config.chart_period_ms, config.duration_secs
    );
}

fn display_report(report: &PipelineReport) {
    println!("\n=== Pipeline Results ===");
    println!("Render frames: {}", report.frames);
    println!(
        "Samples charted: {} ({} currently held)",
        report.samples_appended, report.history_len
    );
    if let Some((start, end)) = report.span {
        println!("Axis span: {start:.2}s to {end:.2}s");
    }
    if let Some(frame) = &report.last_frame {
        println!(
            "Final view window: entries {}..={}, auto-scroll {}",
            frame.visible.0, frame.visible.1, frame.auto_scroll
        );
    }

    let diagnostics = &report.diagnostics;
    println!("Dropped samples (queue full): {}", diagnostics.dropped_samples);
    println!("Source faults: {}", diagnostics.source_faults);
    println!("Evicted history entries: {}", diagnostics.evicted_samples);
    println!("Truncated batch samples: {}", diagnostics.truncated_samples);
}
