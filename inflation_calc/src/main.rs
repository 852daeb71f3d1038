// inflation_calc/src/main.rs

mod cli;

fn main() -> anyhow::Result<std::process::ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = cli::Args::parse();
    let settings = match &args.config {
        Some(path) => inflation_core::settings::Settings::load(path)?,
        None => inflation_core::settings::Settings::default(),
    };

    let table = match &args.table {
        Some(path) => inflation_core::IndexTable::load(path)?,
        None => settings.index_table()?,
    };

    if args.range {
        print_range(&table, args.json)?;
        return anyhow::Ok(std::process::ExitCode::SUCCESS);
    }

    let amount = args.amount.clone().unwrap_or_else(|| settings.defaults.amount.to_string());
    let start = args.start.clone().unwrap_or_else(|| settings.defaults.start_year.to_string());
    let end = args.end.clone().unwrap_or_else(|| settings.defaults.end_year.to_string());

    let feed = inflation_core::feed::SimulatedFeed::new(std::sync::Arc::new(table))
        .with_latency(settings.simulated_latency());
    log::debug!("Index lookups delayed by {:?}", feed.latency());
    let outcome = futures::executor::block_on(feed.calculate(amount, start, end));

    match outcome {
        Ok(result) => {
            print_result(&result, args.json)?;
            anyhow::Ok(std::process::ExitCode::SUCCESS)
        }
        Err(err) => {
            log::warn!("Calculation failed ({})", err.kind());
            print_failure(&err, args.json)?;
            anyhow::Ok(std::process::ExitCode::FAILURE)
        }
    }
}

fn print_result(result: &inflation_core::CalculationResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return anyhow::Ok(());
    }

    println!("{}", result.summary());
    for (label, value) in result.to_stats_list() {
        println!(" - {}: {}", label, value);
    }
    anyhow::Ok(())
}

fn print_failure(err: &inflation_core::CalcError, json: bool) -> anyhow::Result<()> {
    if json {
        let report = serde_json::json!({
            "error": err,
            "message": err.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!("{}", err);
    }
    anyhow::Ok(())
}

fn print_range(table: &inflation_core::IndexTable, json: bool) -> anyhow::Result<()> {
    use inflation_core::IndexSource;

    let (min_year, max_year) = table.supported_range();
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
    } else {
        println!("Index data available for {} years, {} to {}", table.len(), min_year, max_year);

        let present: std::collections::BTreeSet<i32> = table.years().collect();
        let gaps: Vec<String> = (min_year..=max_year)
            .filter(|year| !present.contains(year))
            .map(|year| year.to_string())
            .collect();
        if !gaps.is_empty() {
            println!("No data for: {}", gaps.join(", "));
        }
    }
    anyhow::Ok(())
}
