use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use locale_router::config::load_config;
use locale_router::http::DispatchDocument;
use locale_router::routing::{RequestInfo, Resolution, Router};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect a locale-router route table offline", long_about = None)]
struct Cli {
    /// Route table and server configuration (TOML).
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List compiled routes per language
    Routes,
    /// Resolve a request target, e.g. `match GET "/es/about/?x=1"`
    Match {
        method: String,
        target: String,
        #[arg(long, default_value = "localhost")]
        host: String,
    },
    /// Generate the path of a named route; use `-` for an absent parameter
    Url {
        language: String,
        name: String,
        params: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let router = Router::from_config(&config)?;

    let output = match cli.command {
        Commands::Routes => list_routes(&router),
        Commands::Match { method, target, host } => {
            let request = RequestInfo {
                method: &method,
                target: &target,
                scheme: &config.server.scheme,
                host: &host,
            };
            match router.resolve(&request) {
                Resolution::Redirect(redirect) => json!({
                    "status": redirect.status().as_u16(),
                    "location": redirect.location(),
                }),
                Resolution::Outcome(outcome) => {
                    serde_json::to_value(DispatchDocument::from_outcome(&outcome))?
                }
            }
        }
        Commands::Url { language, name, params } => {
            let params: Vec<Option<&str>> = params
                .iter()
                .map(|p| (p != "-").then_some(p.as_str()))
                .collect();
            json!({ "path": router.path_for(&language, &name, &params)? })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn list_routes(router: &Router) -> Value {
    let table = router.table();
    let languages: serde_json::Map<String, Value> = table
        .languages()
        .into_iter()
        .map(|language| {
            let routes: Vec<Value> = table
                .routes_for(language)
                .iter()
                .map(|route| {
                    json!({
                        "name": route.name(),
                        "methods": route.methods(),
                        "template": route.template(),
                        "pattern": route.pattern().as_str(),
                        "controller": route.controller(),
                        "middleware": route.middleware(),
                    })
                })
                .collect();
            (language.to_string(), Value::Array(routes))
        })
        .collect();

    json!({
        "base_path": router.base_path(),
        "default_language": table.default_language(),
        "languages": languages,
    })
}
