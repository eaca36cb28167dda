use campus_anchor::{DisplayState, EngineConfig, GeoPoint, TourSession};
use serde::Deserialize;
use std::error::Error;

/// One recorded location-service sample
#[derive(Debug, Deserialize)]
struct Sample {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    heading: Option<f64>,
}

fn usage(program: &str) -> String {
    format!("Usage: {} <buildings.json> <samples.json> [config.json]", program)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("campus-anchor", |s| s.as_str());

    if args.len() < 3 || args.len() > 4 {
        eprintln!("{}", usage(program));
        return Err("Invalid arguments".into());
    }

    let config = match args.get(3) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let mut session = TourSession::new(config)?;
    let dataset = std::fs::read_to_string(&args[1])?;
    let count = session.load_dataset_json(&dataset)?;
    println!("Loaded {} building records", count);

    session.register_overlay_callback(Box::new(|event, plan| {
        println!(
            "  {:<24} {:>6} -> {:<6} at ({:.1}, {:.1}) m  fade in {:?}, out {:?}",
            event.building_id.as_str(),
            event.old_state.to_string(),
            event.new_state.to_string(),
            event.anchor.position().x,
            event.anchor.position().z,
            plan.fade_in.as_ref().map(ToString::to_string),
            plan.fade_out.as_ref().map(ToString::to_string),
        );
    }));
    session.register_enrichment_callback(Box::new(|request| {
        println!(
            "  fetch details for {} (image: {}, description: {})",
            request.display_name,
            request.image_url.as_deref().unwrap_or("none"),
            request.description_url.as_deref().unwrap_or("none"),
        );
    }));

    let samples: Vec<Sample> = serde_json::from_str(&std::fs::read_to_string(&args[2])?)?;

    for (i, sample) in samples.iter().enumerate() {
        if let Some(heading) = sample.heading {
            session.on_heading(heading);
        }

        let location = GeoPoint::new(sample.latitude, sample.longitude);
        println!("Sample {} at {}", i, location);

        match session.on_location(location) {
            Ok(outcome) => {
                for rejected in &outcome.rejected {
                    println!("  skipped: {}", rejected);
                }
            }
            Err(e) => println!("  not processed: {}", e),
        }
    }

    let counts = session.engine().counts();
    println!(
        "Final: {} tracked, {} {}, {} {}, {} {}",
        counts.total(),
        counts.hidden,
        DisplayState::Hidden,
        counts.label,
        DisplayState::Label,
        counts.detail,
        DisplayState::Detail,
    );

    Ok(())
}
