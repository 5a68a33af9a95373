use clap::Parser;
use colored::Colorize;
use crossover_study::cli::{BatchArgs, Cli, Command, ProblemArg, RunArgs};
use crossover_study::crossover::Crossover;
use crossover_study::encoding::Chromosome;
use crossover_study::error::Error;
use crossover_study::experiment::run_batch;
use crossover_study::knapsack::KnapsackProblem;
use crossover_study::plot::plot_convergence;
use crossover_study::problem::{reported_cost, LoadInstance, Problem};
use crossover_study::record::{append_csv_row, CsvSink, RecordSink};
use crossover_study::runner::{instance_label, RunResult, Runner};
use crossover_study::set_covering::SetCoveringProblem;
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // Usage problems and help requests leave through a code scripts
            // can tell apart from runtime failures.
            let _ = error.print();
            process::exit(127);
        }
    };

    if let Err(error) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), error);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Knapsack(args) => {
            run_single::<KnapsackProblem>("knapsack", &args, |problem, result| {
                if let Some(optimal) = problem.optimal() {
                    println!(
                        "{:.1}% of the best known value {}",
                        result.total_cost / optimal * 100.0,
                        optimal
                    );
                }
            })
        }
        Command::SetCovering(args) => {
            run_single::<SetCoveringProblem>("set-covering", &args, |problem, result| {
                let mut best = Chromosome::zeroed(problem.dimension());
                for &row in &result.selected {
                    best.set(row - 1, true);
                }
                if problem.is_cover(&best) {
                    println!("All {} columns covered", problem.num_columns());
                } else {
                    println!("{}", "Best solution does not cover every column".yellow());
                }
            })
        }
        Command::Batch(args) => match args.problem {
            ProblemArg::Knapsack => batch_for::<KnapsackProblem>("knapsack", &args),
            ProblemArg::SetCovering => batch_for::<SetCoveringProblem>("set-covering", &args),
        },
    }
}

fn separator() {
    println!("{}", "-".repeat(60));
}

fn run_single<P>(
    problem_name: &str,
    args: &RunArgs,
    epilogue: impl Fn(&P, &RunResult),
) -> Result<(), Error>
where
    P: Problem + LoadInstance,
{
    let mut runner = Runner::<P>::from_file(&args.infile, args.stop_kind())?;
    let config = args.run_config();
    let crossover = Crossover::from_id(config.crossover_id)?;

    println!("{}: {}", problem_name, instance_label(&args.infile));
    separator();
    let mut info = Vec::new();
    runner
        .problem()
        .display_info(&mut info)
        .expect("write to an in-memory buffer");
    print!("{}", String::from_utf8_lossy(&info));
    println!(
        "population {}, {} bound {}, {} crossover at {}, mutation {}, tournament {}",
        config.population_size,
        args.stop_kind().label(),
        config.stop_bound,
        crossover.name(),
        config.crossover_rate,
        config.mutation_rate,
        config.tournament_size,
    );
    separator();

    let sense = runner.problem().sense();
    println!("{}", "Starting evolution".green().bold());
    runner.execute(&config, |generation, population| {
        let best = reported_cost(population.best().fitness(), sense);
        println!(
            "{} best cost: {:.2}",
            format!("Generation {:>4}", generation + 1).blue().bold(),
            best
        );
    })?;
    let result = runner.result()?.clone();

    separator();
    println!(
        "{} selected: {}",
        result.solution_size(),
        result.formatted_solution()
    );
    println!("Total cost: {:.2}", result.total_cost);
    println!("Duration: {} ms", result.duration.as_millis());
    epilogue(runner.problem(), &result);

    if let Some(db) = &args.db {
        let record = runner.record(problem_name, &config)?;
        let mut sink = CsvSink::new(db);
        sink.record(&record)?;
        println!("Run data saved to {}", db.display());
    }
    if let Some(path) = &args.plot {
        let title = format!("{} {}", problem_name, result.instance_file);
        plot_convergence(path, &title, &result.convergence)?;
        println!("Convergence chart saved to {}", path.display());
    }

    Ok(())
}

fn batch_for<P>(problem_name: &str, args: &BatchArgs) -> Result<(), Error>
where
    P: Problem + LoadInstance + Clone,
{
    let problem = P::from_instance_file(&args.run.infile)?;
    let plan = args.plan();
    let combinations =
        plan.crossover_ids.len() * plan.crossover_rates.len() * plan.mutation_rates.len();
    println!(
        "{}: {} combinations x {} repetitions on {}",
        problem_name,
        combinations,
        plan.repetitions,
        instance_label(&args.run.infile)
    );

    let summaries = run_batch(
        &problem,
        &instance_label(&args.run.infile),
        args.run.stop_kind(),
        &args.run.run_config(),
        &plan,
    )?;

    separator();
    println!(
        "{}",
        format!(
            "{:<10} {:>6} {:>6} {:>12} {:>12} {:>12} {:>10}",
            "crossover", "xrate", "mrate", "best", "mean", "variance", "mean ms"
        )
        .bold()
    );
    for summary in &summaries {
        println!(
            "{:<10} {:>6.2} {:>6.2} {:>12.2} {:>12.2} {:>12.2} {:>10.1}",
            summary.crossover,
            summary.crossover_rate,
            summary.mutation_rate,
            summary.best_cost,
            summary.mean_cost,
            summary.var_cost,
            summary.mean_duration_ms,
        );
    }

    if let Some(db) = &args.run.db {
        for summary in &summaries {
            append_csv_row(db, summary)?;
        }
        println!("Summaries saved to {}", db.display());
    }

    Ok(())
}
