// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tirith_core::{
    open_dashboard, recommend, Dashboard, JsonFileStorage, Navigator, TirithConfig, FAVORITES_ID,
};
use tirith_insight::{InsightKind, InsightService};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;
mod script;
mod session;

use session::Output;

#[derive(Parser, Debug, Clone)]
#[command(name = "tirith")]
#[command(about = "Metric dashboard: chart recommendation, drill-down and AI insights")]
struct Cli {
    #[arg(long, default_value_t = false)]
    debug: bool,
    /// TOML config; falls back to $TIRITH_CONFIG, then defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Favorites storage file, overriding the config.
    #[arg(long, value_name = "PATH")]
    storage: Option<PathBuf>,
    /// Print render plans as JSON lines.
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// List categories and the favorites pseudo-category.
    Categories,
    /// Show the cards of a category, or `favorites`.
    Show { id: String },
    /// Star or unstar a metric.
    Favorite { metric: String },
    /// Drill through one chart interactively (click, drill, back, toggle, show, quit).
    Explore { metric: String },
    /// Run a command script against one chart on a virtual clock.
    Replay { metric: String, script: PathBuf },
    /// Ask the generative model about a category.
    Insight {
        category: String,
        /// Weakest-metric roadmap on the reasoning model.
        #[arg(long, default_value_t = false)]
        deep: bool,
    },
}

fn init_tracing(debug: bool) {
    let default = if debug {
        "debug,reqwest=info,hyper=info,hyper_util=info,rustls=info"
    } else {
        "info,reqwest=warn,hyper=warn,hyper_util=warn,rustls=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = TirithConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let mut dashboard = open_dashboard(&config, cli.storage.as_deref())?;
    let output = if cli.json { Output::Json } else { Output::Text };

    match cli.command {
        Commands::Categories => {
            print!(
                "{}",
                render::categories(dashboard.catalog(), dashboard.favorites())
            );
        }
        Commands::Show { id } => {
            dashboard.select(&id);
            if dashboard.selection().id() != id {
                warn!(requested = %id, shown = dashboard.selection().id(), "unknown category");
            }
            print!("{}", render::view(&dashboard.view()));
        }
        Commands::Favorite { metric } => {
            if dashboard.catalog().find_metric(&metric).is_none() {
                bail!("unknown metric '{metric}'");
            }
            let starred = dashboard.toggle_favorite(&metric);
            println!("{} {metric}", if starred { "★ starred" } else { "☆ unstarred" });
        }
        Commands::Explore { metric } => {
            let navigator = navigator_for(&dashboard, &config, &metric)?;
            session::explore(navigator, output).await?;
        }
        Commands::Replay { metric, script } => {
            let navigator = navigator_for(&dashboard, &config, &metric)?;
            let source = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            session::replay(navigator, &source, output)?;
        }
        Commands::Insight { category, deep } => {
            insight(&mut dashboard, &config, &category, deep).await?;
        }
    }
    Ok(())
}

fn navigator_for(
    dashboard: &Dashboard<JsonFileStorage>,
    config: &TirithConfig,
    metric_id: &str,
) -> Result<Navigator> {
    let (category, metric) = dashboard
        .catalog()
        .find_metric(metric_id)
        .ok_or_else(|| anyhow!("unknown metric '{metric_id}'"))?;
    info!(metric = %metric.id, category = %category.id, "opening chart");
    Ok(Navigator::with_timing(
        category.series(&metric.id).to_vec(),
        recommend(metric),
        config.timing.to_timing(),
    ))
}

async fn insight(
    dashboard: &mut Dashboard<JsonFileStorage>,
    config: &TirithConfig,
    category_id: &str,
    deep: bool,
) -> Result<()> {
    if category_id == FAVORITES_ID {
        bail!("insights are not available for the favorites view");
    }
    let category = dashboard
        .catalog()
        .get(category_id)
        .cloned()
        .ok_or_else(|| anyhow!("unknown category '{category_id}'"))?;
    dashboard.select(&category.id);
    if !dashboard.insights_enabled() {
        bail!("insights are disabled for this view");
    }

    let service = InsightService::from_config(config.insight.clone())?;
    let kind = if deep { InsightKind::Deep } else { InsightKind::Fast };
    let Some(reply) = service.request(kind, &category).await else {
        bail!("an insight request is already running");
    };
    match kind {
        InsightKind::Fast => dashboard.set_insight(reply.into_text()),
        InsightKind::Deep => dashboard.set_strategy(reply.into_text()),
    }
    print!("{}", render::panel(dashboard.insight_panel()));
    Ok(())
}
