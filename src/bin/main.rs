use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use log::LevelFilter;
use reverend::{Classifier, ClassifierConfig, Guess};
use std::io::{stdin, stdout, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reverend", version, about = "Interactive naive-Bayes text classifier")]
struct Args {
    /// Corpus file; `.json` selects the JSON codec, anything else binary
    #[arg(short, long, default_value = "corpus.bin")]
    corpus: PathBuf,

    /// YAML classifier configuration
    #[arg(short = 'f', long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let config = match &args.config {
        Some(path) => ClassifierConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    let mut classifier = Classifier::open(&args.corpus, config)
        .with_context(|| format!("failed to open corpus {}", args.corpus.display()))?;

    println!("{}", "Reverend classifier. Type 'help' for commands, 'exit' to save and quit.".bold());
    prompt()?;

    for line in stdin().lock().lines() {
        let line = line?;
        let (command, rest) = split_word(line.trim());

        match command {
            "" => {}
            "exit" | "quit" => break,
            "help" => print_help(),
            "train" | "untrain" => {
                let (label, text) = split_word(rest);
                let result = if command == "train" {
                    classifier.train(label, text)
                } else {
                    classifier.untrain(label, text)
                };
                report(result.map(|_| format!("{command}ed '{label}'")));
            }
            "guess" => print_guesses(&classifier.guess(rest)),
            "pools" => {
                let pools = classifier.pools();
                if pools.is_empty() {
                    println!("No pools trained yet.");
                }
                for label in pools {
                    let count = classifier.train_count(&label).unwrap_or(0);
                    println!("  {} ({} items)", label.as_str().cyan(), count);
                }
            }
            "new" => report(classifier.new_pool(rest).map(|_| format!("created '{rest}'"))),
            "remove" => report(classifier.remove_pool(rest).map(|_| format!("removed '{rest}'"))),
            "rename" => {
                let (from, to) = split_word(rest);
                report(classifier.rename_pool(from, to).map(|_| format!("renamed '{from}' to '{to}'")));
            }
            "merge" => {
                let (dest, source) = split_word(rest);
                report(classifier.merge_pools(dest, source).map(|_| format!("merged '{source}' into '{dest}'")));
            }
            "tokens" => {
                let (label, n) = split_word(rest);
                let limit = n.parse::<usize>().unwrap_or(10);
                match classifier.pool_data(label) {
                    Ok(data) => {
                        for (token, count) in data.into_iter().take(limit) {
                            println!("  {token:<24} {count}");
                        }
                    }
                    Err(e) => report::<String>(Err(e)),
                }
            }
            "save" => report(classifier.save().map(|_| format!("saved to {}", args.corpus.display()))),
            other => println!("{} unknown command '{other}'", "?".yellow()),
        }
        prompt()?;
    }

    println!("\nSaving corpus...");
    classifier
        .save()
        .with_context(|| format!("could not save corpus to {}", args.corpus.display()))?;
    println!("Corpus saved to '{}'", args.corpus.display());
    Ok(())
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim_start()),
        None => (input, ""),
    }
}

fn report<T: std::fmt::Display>(result: reverend::Result<T>) {
    match result {
        Ok(message) => println!("{} {message}", "ok".green()),
        Err(e) => println!("{} {e}", "error".red()),
    }
}

fn print_guesses(guesses: &[Guess]) {
    if guesses.is_empty() {
        println!("No guess (nothing trained, or no tokens in the text).");
        return;
    }
    for (i, guess) in guesses.iter().enumerate() {
        let line = format!("  {:>6.2}%  {}", guess.probability * 100.0, guess.label);
        if i == 0 {
            println!("{}", line.bold());
        } else {
            println!("{line}");
        }
    }
}

fn print_help() {
    println!("  train <label> <text>     add an example");
    println!("  untrain <label> <text>   remove an example");
    println!("  guess <text>             rank categories");
    println!("  pools                    list categories");
    println!("  new <label>              create an empty category");
    println!("  remove <label>           delete a category");
    println!("  rename <old> <new>       rename a category");
    println!("  merge <dest> <src>       add src's counts into dest");
    println!("  tokens <label> [n]       top tokens of a category");
    println!("  save                     write the corpus");
    println!("  exit                     save and quit");
}

fn prompt() -> Result<()> {
    print!("> ");
    stdout().flush()?;
    Ok(())
}
