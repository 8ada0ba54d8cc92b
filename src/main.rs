use anyhow::Result;
use clap::Parser;
use retail_insights::llm::LlmClient;
use retail_insights::loader;
use retail_insights::session::{render_table, ChatOutcome, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "retail-insights")]
#[command(about = "Upload retail data and ask business questions in natural language")]
struct Args {
    /// Dataset file (CSV or Excel)
    file: PathBuf,

    /// One-shot question; omit to start an interactive prompt
    #[arg(short, long)]
    question: Option<String>,

    /// Generate an executive summary before taking questions
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let dataset = loader::load_dataset(&args.file)?;
    println!(
        "Loaded {} rows x {} columns (dataset type: {})",
        dataset.frame.height(),
        dataset.frame.width(),
        dataset.kind
    );
    println!("Preview:\n{}\n", render_table(&dataset.frame));

    let llm = Arc::new(LlmClient::from_env()?);
    let mut session = Session::new(dataset, llm);
    println!("Schema:\n{}\n", session.schema_listing());

    if args.summary {
        match session.summarize().await? {
            Some(summary) => println!("Business Summary:\n{}\n", summary),
            None => println!("No summary blocks are available for this dataset type.\n"),
        }
    }

    if let Some(question) = args.question {
        respond(&mut session, &question).await;
        return Ok(());
    }

    info!("Starting interactive prompt");
    println!("Ask a question (or 'quit' to exit).");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == "quit" || question == "exit" {
            break;
        }

        respond(&mut session, question).await;
    }

    Ok(())
}

async fn respond(session: &mut Session, question: &str) {
    match session.ask(question).await {
        ChatOutcome::Answer {
            sql,
            table,
            insight,
            truncated_from,
            ..
        } => {
            println!("\nGenerated SQL:\n{}\n", sql);
            println!("Result:\n{}", render_table(&table));
            if let Some(original) = truncated_from {
                println!("(truncated: showing 1,000 of {} rows)", original);
            }
            println!("\nInsight:\n{}\n", insight);
        }
        ChatOutcome::Warning { sql, message } => {
            println!("\nGenerated SQL:\n{}\n", sql);
            println!("{}\n", message);
        }
        ChatOutcome::Failure { message } => {
            println!("\n{}\n", message);
        }
    }
}
