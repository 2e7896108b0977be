use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use presto::app::{App, RouteGroup};
use presto::config::AppConfig;
use presto::dispatcher::HandlerResponse;
use presto::middleware::RequestLogger;
use presto::views::ViewEngineConfig;

#[derive(Parser, Debug)]
#[command(name = "presto", about = "Minimal coroutine-powered HTTP router demo")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,
    /// Directory the static-asset prefix maps into.
    #[arg(long, default_value = ".")]
    assets_root: PathBuf,
    /// Template directory; enables the minijinja view engine when set.
    #[arg(long)]
    templates: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = AppConfig {
        assets_root: args.assets_root,
        ..AppConfig::default()
    };
    if let Some(directory) = args.templates {
        config.view_engine = Some(ViewEngineConfig::new("minijinja", directory));
    }

    let mut builder = App::builder(config)?;
    let views = builder.views();

    builder.get("/", None, |_req| Ok(HandlerResponse::text(200, "welcome")))?;
    builder.get("/home/:id/:slug", Some(Arc::new(RequestLogger)), |req| {
        Ok(HandlerResponse::json(
            200,
            json!({ "params": req.params, "query": req.query }),
        ))
    })?;
    builder.post("/items", Some(Arc::new(RequestLogger)), |req| {
        Ok(HandlerResponse::json(201, json!({ "received": req.body })))
    })?;
    if let Some(views) = views {
        builder.get("/hello/:name", None, move |req| {
            let name = req.param("name").unwrap_or_default().to_string();
            Ok(views.render("hello.html", &json!({ "name": name }))?)
        })?;
    }
    builder.mount(
        RouteGroup::new("/welcome")
            .get("/", None, |_req| {
                Ok(HandlerResponse::text(200, "Welcome to root"))
            })
            .get("/home", None, |_req| {
                Ok(HandlerResponse::text(200, "Welcome to home"))
            }),
    )?;

    let app = builder.build();
    let handle = app.listen(args.addr.as_str())?;

    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        if let Some(signal) = signals.forever().next() {
            info!(signal, "shutting down");
        }
        handle.stop();
    }
    #[cfg(not(unix))]
    {
        if handle.join().is_err() {
            anyhow::bail!("server coroutine panicked");
        }
    }

    Ok(())
}
