//! # PEMB Estimator CLI
//!
//! Terminal front end for the pre-engineered metal building estimation
//! engine. Prompts for the main building parameters, runs a full estimate
//! against the built-in reference catalogs and prints the summary plus a
//! JSON snapshot for downstream tooling.

use std::io::{self, BufRead, Write};

use pemb_core::aggregate::SheetKind;
use pemb_core::estimate::Estimation;
use pemb_core::refdata::builtin_store;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_str(prompt: &str, default: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default.to_string();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default.to_string();
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn main() {
    println!("PEMB Estimator - Metal Building Estimation Engine");
    println!("=================================================");
    println!();

    let spans = prompt_str("Spans (e.g. 1@24 or 2@24,1@18) [1@24]: ", "1@24");
    let bays = prompt_str("Bays (e.g. 6@6) [6@6]: ", "6@6");
    let eave = prompt_f64("Back eave height (m) [8.0]: ", 8.0);
    let slope = prompt_f64("Roof slope (rise per 10) [1.0]: ", 1.0);
    let wind = prompt_f64("Wind speed (km/h) [130.0]: ", 130.0);
    let live = prompt_f64("Live load (kN/m2) [0.57]: ", 0.57);
    let steel_markup = prompt_f64("Steel markup (e.g. 0.10) [0.0]: ", 0.0);

    println!();
    println!("Calculating estimate...");
    println!();

    let store = builtin_store();
    let mut est = Estimation::new("CLI Demo", "demo", "");
    est.building.spans = spans;
    est.building.bays = bays;
    est.building.back_eave_height_m = eave;
    est.building.roof_slope = slope;
    est.building.wind_speed_kmh = wind;
    est.building.live_load_knm2 = live;
    est.building.frame_type = "CLEAR_SPAN".to_string();
    est.building.base_type = "PINNED".to_string();
    est.markups.steel = steel_markup;

    match est.recalculate(&store) {
        Ok(result) => {
            let dims = &result.dimensions;
            println!("═══════════════════════════════════════");
            println!("  ESTIMATE SUMMARY");
            println!("═══════════════════════════════════════");
            println!();
            println!("Geometry:");
            println!("  Width:   {:.1} m x Length: {:.1} m", dims.width_m, dims.length_m);
            println!("  Eave:    {:.2} m, Peak: {:.2} m", dims.back_eave_height_m, dims.peak_height_m);
            println!("  Frames:  {} ({} spans x {} bays)", dims.n_frames, dims.n_spans, dims.n_bays);
            println!();
            println!("Loads:");
            println!(
                "  Wind pressure: {:.3} kN/m2 (Cp = {:.1})",
                result.loads.wind_velocity_pressure_knm2, result.loads.pressure_coefficient
            );
            println!();
            println!("Categories:");
            for (category, total) in &result.categories {
                println!(
                    "  {:<20} {:>10.1} kg  {:>12.2} AED",
                    category.display_name(),
                    total.weight_kg,
                    total.marked_price_aed
                );
            }
            println!();
            println!("═══════════════════════════════════════");
            println!("  TOTAL: {:.2} MT   FOB: {:.2} AED", result.summary.total_weight_mt, result.summary.fob_price_aed);
            println!("  SELL:  {:.2} AED  ({:.2} AED/MT)", result.summary.total_price_aed, result.summary.price_per_mt);
            println!("═══════════════════════════════════════");

            println!();
            println!("Recap JSON (for API use):");
            if let Ok(json) = serde_json::to_string_pretty(&result.sheet(SheetKind::Recap)) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }
}
