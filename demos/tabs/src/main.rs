//! tabs — a document viewer driven entirely by its URL.
//!
//! The router tree is declared as JSON, the same shape a front end would ship
//! with its bundle.  Each step prints the resulting URL and the routers that
//! changed.  Set `RUST_LOG=rp_manager=debug` (or `trace`) to watch the action
//! pipeline.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rp_core::{Action, LocationOptions, RouterDeclaration};
use rp_manager::{Manager, ManagerBuilder, ManagerConfig};

// ── Router tree ───────────────────────────────────────────────────────────────

const ROUTERS: &str = r#"{
    "name": "root",
    "routers": {
        "scene": [
            {
                "name": "docs",
                "defaultAction": ["show"],
                "routers": {
                    "data": [{ "name": "doc", "defaultAction": ["show", "readme"] }],
                    "feature": [{ "name": "outline", "routeKey": "o" }]
                }
            },
            { "name": "settings" }
        ],
        "feature": [{ "name": "sidebar", "routeKey": "sb" }],
        "stack": [{ "name": "share" }, { "name": "export" }],
        "data": [{ "name": "search", "routeKey": "q" }]
    }
}"#;

const ROUTER_NAMES: [&str; 9] = [
    "root", "docs", "doc", "outline", "settings", "sidebar", "share", "export", "search",
];

// ── Helpers ───────────────────────────────────────────────────────────────────

fn report(step: &str, manager: &Manager) {
    let changed: Vec<&str> = ROUTER_NAMES
        .iter()
        .copied()
        .filter(|name| manager.just_changed(name))
        .collect();
    println!("{step:<28} {:<36} changed: {}", manager.url(), changed.join(", "));
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config: ManagerConfig = serde_json::from_str(r#"{ "historySize": 4 }"#)?;
    let mut manager = ManagerBuilder::new(RouterDeclaration::from_json(ROUTERS)?)
        .config(config)
        .build()?;
    info!(routers = manager.tree().len(), "manager ready");
    report("start", &manager);

    manager.router("docs")?.show(LocationOptions::new())?;
    report("show docs", &manager);

    manager.router("doc")?.set_data("guide", LocationOptions::new())?;
    report("open guide", &manager);

    manager.router("outline")?.show(LocationOptions::new())?;
    manager.router("sidebar")?.show(LocationOptions::new())?;
    report("outline + sidebar", &manager);

    manager.router("share")?.show(LocationOptions::new())?;
    manager.router("export")?.show(LocationOptions::new())?;
    report("share, then export", &manager);

    manager.router("share")?.to_front(LocationOptions::new())?;
    report("share to front", &manager);

    let preview = manager.link("settings", Action::Show, LocationOptions::new())?;
    println!("{:<28} {preview}", "link to settings");

    manager.router("settings")?.show(LocationOptions::new().add_cache())?;
    report("show settings (cached)", &manager);

    manager.router("docs")?.show(LocationOptions::new())?;
    report("back to docs", &manager);

    manager.router("search")?.set_data("rust router", LocationOptions::new())?;
    report("search", &manager);

    manager.back()?;
    report("history back", &manager);

    let visits = manager.router("doc")?.history()?;
    println!("doc history: {:?}", visits.iter().map(|s| s.data.as_deref()).collect::<Vec<_>>());

    Ok(())
}
