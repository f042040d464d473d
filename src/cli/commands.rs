use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{ObservationRequest, YearMonth};
use crate::processors::{GasPipeline, RoseRequest, ViewMode, ViewRequest};
use crate::readers::JsonFileSource;
use crate::utils::filename::{daily_average_filename, default_hourly_output, hourly_export_filename};
use crate::utils::progress::ProgressReporter;
use crate::writers::CsvWriter;
use tracing::{debug, warn};

pub fn run(cli: Cli) -> Result<()> {
    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    let pipeline = GasPipeline::new(config).with_mmap(cli.mmap);

    match cli.command {
        Commands::Dates { site, max_workers } => {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(max_workers)
                .build_global()
            {
                warn!(error = %e, "Using the existing thread pool");
            }

            let catalog = pipeline.catalog(&site)?;
            println!(
                "{}: {} files covering {}",
                catalog.site(),
                catalog.files().len(),
                catalog
                    .months()
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            // Verbose log lines and the bar share stderr
            let progress = ProgressReporter::for_files(
                catalog.files().len() as u64,
                "Scanning site files...",
                cli.verbose,
            );
            let dates = catalog.available_dates(pipeline.reader(), pipeline.normalizer(), &progress);
            progress.finish_with_message(&format!("Found {} dates", dates.len()));

            for date in &dates {
                println!("{}", date);
            }
        }

        Commands::View {
            site,
            gas,
            date,
            mode,
            export,
        } => {
            let view = pipeline.view(&ViewRequest {
                site,
                gas,
                date,
                mode: mode.into(),
            })?;
            let unit = pipeline.config().unit_for(gas);

            println!("{} {} ({}) from {}", view.site, gas, view.mode, view.source.display());
            println!("{}", view.summary_text(unit));

            match view.mode {
                ViewMode::SingleDay => {
                    for (timestamp, value) in view.series.points(gas) {
                        match value {
                            Some(v) => println!("  {}  {:.3} {}", timestamp.format("%H:%M"), v, unit),
                            None => println!("  {}  -", timestamp.format("%H:%M")),
                        }
                    }
                }
                ViewMode::FullMonth => {
                    for day in &view.daily_means {
                        match day.mean {
                            Some(v) => println!("  {}  {:.3} {}", day.date, v, unit),
                            None => println!("  {}  -", day.date),
                        }
                    }
                }
            }

            if let Some(dir) = export {
                let writer = CsvWriter::new();
                let hourly = dir.join(hourly_export_filename(&view.site, gas, date));
                writer.write_hourly_file(&view.series, &[gas], &hourly)?;
                println!("Exported {}", hourly.display());

                if view.mode == ViewMode::FullMonth {
                    let daily = dir.join(daily_average_filename(&view.site, gas, YearMonth::of(&date)));
                    writer.write_daily_means_file(&view.daily_means, gas, &daily)?;
                    println!("Exported {}", daily.display());
                }
            }
        }

        Commands::Rose {
            site,
            pollutant,
            date,
            mode,
            aggregation,
            output,
        } => {
            let rose = pipeline.wind_rose(&RoseRequest {
                site,
                pollutant,
                date,
                scope: mode.into(),
                aggregation: aggregation.into(),
            })?;

            println!(
                "{} wind rose ({}), {} observations",
                rose.pollutant, rose.mode, rose.observations
            );
            for bin in &rose.bins {
                println!("  {:>3}°  {:<14} {}", bin.sector, bin.label, bin.count);
            }

            if let Some(path) = output {
                CsvWriter::new().write_wind_rose_file(&rose, &path)?;
                println!("Wrote {}", path.display());
            }
        }

        Commands::Hourly { input, output } => {
            let output = output.unwrap_or_else(|| default_hourly_output(&input));
            let series = pipeline.load_hourly(&input, &[])?;
            let fields = series.present_fields();

            CsvWriter::new().write_hourly_file(&series, &fields, &output)?;
            println!(
                "Converted {} to {} hourly rows in {}",
                input.display(),
                series.len(),
                output.display()
            );
        }

        Commands::ApiImport {
            input,
            site_id,
            parameter,
            start,
            end,
            output,
        } => {
            let request = ObservationRequest::for_parameter(
                &pipeline.config().api,
                &parameter,
                vec![site_id],
                start,
                end,
            )?;
            debug!(
                url = %pipeline.config().api.observations_url(),
                payload = %serde_json::to_string(&request)?,
                "Observation request"
            );
            let source = JsonFileSource::new(&input);
            let series = pipeline.import_api(&source, &request, site_id)?;

            let output = output.unwrap_or_else(|| default_hourly_output(&input));
            CsvWriter::new().write_hourly_file(&series, &series.present_fields(), &output)?;
            println!(
                "Imported {} hourly rows of {} for site {} into {}",
                series.len(),
                parameter,
                site_id,
                output.display()
            );
        }
    }

    Ok(())
}
