use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "vhostctl")]
#[command(about = "Management CLI for the vhost-manager daemon", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all hosts and their mappings
    List,
    /// Create a mapping (fails if the path already exists)
    Create {
        name: String,
        path: String,
        upstream: String,
        #[arg(default_value = "")]
        custom_tags: String,
    },
    /// Insert or overwrite a mapping (empty --name targets the default server)
    Set {
        #[arg(long, default_value = "")]
        name: String,
        path: String,
        upstream: String,
        #[arg(default_value = "")]
        custom_tags: String,
    },
    /// Move or update an existing mapping
    Modify {
        name: String,
        path: String,
        new_path: String,
        upstream: String,
        #[arg(default_value = "")]
        custom_tags: String,
    },
    /// Delete a mapping
    Delete { name: String, path: String },
    /// Delete a mapping (empty --name targets the default server)
    Unset {
        #[arg(long, default_value = "")]
        name: String,
        path: String,
    },
    /// Enable mappings; omit --path for a whole host, omit both for everything
    Enable {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        path: String,
    },
    /// Disable mappings; omit --path for a whole host, omit both for everything
    Disable {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::List => {
            let res = client.get(format!("{}/api/list", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Create {
            name,
            path,
            upstream,
            custom_tags,
        } => {
            let res = client
                .post(format!("{}/api/create", cli.url))
                .form(&[
                    ("name", name),
                    ("path", path),
                    ("upstream", upstream),
                    ("custom_tags", custom_tags),
                ])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Set {
            name,
            path,
            upstream,
            custom_tags,
        } => {
            let res = client
                .post(format!("{}/api/set", cli.url))
                .form(&[
                    ("name", name),
                    ("path", path),
                    ("upstream", upstream),
                    ("custom_tags", custom_tags),
                ])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Modify {
            name,
            path,
            new_path,
            upstream,
            custom_tags,
        } => {
            let res = client
                .post(format!("{}/api/modify", cli.url))
                .form(&[
                    ("name", name),
                    ("path", path),
                    ("new_path", new_path),
                    ("upstream", upstream),
                    ("custom_tags", custom_tags),
                ])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Delete { name, path } => {
            let res = client
                .post(format!("{}/api/delete", cli.url))
                .form(&[("name", name), ("path", path)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Unset { name, path } => {
            let res = client
                .post(format!("{}/api/unset", cli.url))
                .form(&[("name", name), ("path", path)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Enable { name, path } => {
            let res = client
                .post(format!("{}/api/enable", cli.url))
                .form(&[("name", name), ("path", path)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Disable { name, path } => {
            let res = client
                .post(format!("{}/api/disable", cli.url))
                .form(&[("name", name), ("path", path)])
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
