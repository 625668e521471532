use anyhow::{Context, Result};

use guid_bench::config::Config;
use guid_bench::input::load_identifiers;
use guid_bench::scoring::{BatchJob, DispatchConfig};
use guid_bench::storage::artifact_name;

/// Print the artifacts a run would produce; sends nothing and writes nothing
pub fn plan(config: &Config) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let identifiers = load_identifiers(&config.batch.input_file).with_context(|| {
        format!(
            "Failed to load identifiers from {}",
            config.batch.input_file.display()
        )
    })?;
    let formats = DispatchConfig::from_config(config).formats;
    let job = BatchJob::new(identifiers);

    println!("Batch Plan");
    println!("==========");
    println!("Input: {}", config.batch.input_file.display());
    println!("Output directory: {}", config.batch.output_dir.display());
    println!(
        "Formats: {}",
        formats
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    for item in job.items() {
        println!("{:03} {}", item.seq(), item.identifier);
        for format in &formats {
            println!(
                "    {}",
                artifact_name(&item.identifier, item.index, format.suffix())
            );
        }
    }

    println!(
        "\n{} GUIDs, {} artifacts",
        job.len(),
        job.len() * formats.len()
    );

    Ok(())
}
