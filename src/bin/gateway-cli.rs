use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Send commands to a running command gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an arbitrary command: verb followed by its arguments
    Run {
        verb: String,
        args: Vec<String>,
    },
    /// Look up a configuration key
    Config { key: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder().no_proxy().build()?;

    let res = match cli.command {
        Commands::Run { verb, args } => {
            let invocation: Vec<String> = std::iter::once(verb).chain(args).collect();
            client
                .post(format!("{}/", cli.url))
                .json(&invocation)
                .send()
                .await?
        }
        Commands::Config { key } => {
            client
                .post(format!("{}/", cli.url))
                .json(&["config", key.as_str()])
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body = res.text().await?;

    println!("{}", status);
    if !body.is_empty() {
        print!("{}", body);
        if !body.ends_with('\n') {
            println!();
        }
    }

    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
