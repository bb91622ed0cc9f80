use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use streetlight_app::{HotspotMap, TriageQueue};
use streetlight_common::Config;
use streetlight_gateway::{FileVault, Gateway, Session};

fn usage() -> ! {
    eprintln!(
        "usage: streetlight <command>\n\
         \n\
         commands:\n\
         \x20 login <email> <password>     authenticate and store the token\n\
         \x20 register <email> <password>  create an account\n\
         \x20 logout                       clear the stored token\n\
         \x20 queue                        show the triage queue\n\
         \x20 hotspots                     show hotspot cells\n\
         \x20 seed-demo                    seed demo incidents, aggregate, refresh\n\
         \x20 screening <notes...>         submit screening notes for a risk verdict"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("streetlight=info".parse()?),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let state_dir = std::env::var("STREETLIGHT_STATE_DIR")
        .map(Into::into)
        .unwrap_or_else(|_| std::env::temp_dir().join("streetlight"));
    let vault = Arc::new(FileVault::new(state_dir));

    let session = Arc::new(Session::new(vault, &config.token_key));
    session.load().await;
    let gateway = Arc::new(Gateway::new(config.api_base.clone(), session.clone()));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut args = args.iter().map(String::as_str);

    match args.next() {
        Some("login") => {
            let (email, password) = match (args.next(), args.next()) {
                (Some(e), Some(p)) => (e, p),
                _ => usage(),
            };
            session.login(gateway.as_ref(), email, password).await?;
            let user = session.user().await;
            println!("logged in as {}", user.map(|u| u.email).unwrap_or_default());
        }
        Some("register") => {
            let (email, password) = match (args.next(), args.next()) {
                (Some(e), Some(p)) => (e, p),
                _ => usage(),
            };
            session.register(gateway.as_ref(), email, password).await?;
            println!("registered");
        }
        Some("logout") => {
            session.logout().await;
            println!("logged out");
        }
        Some("queue") => {
            require_auth(&session).await?;
            let mut queue = TriageQueue::new(gateway);
            queue.refresh().await?;
            let summary = queue.summary();
            println!(
                "queue: {} total, {} high, {} critical, {} overdue",
                summary.total, summary.high, summary.critical, summary.overdue
            );
            for row in queue.rows() {
                let follow = match (row.overdue, row.follow_up_in_days) {
                    (true, _) => "OVERDUE".to_string(),
                    (false, Some(d)) => format!("in {d}d"),
                    (false, None) => "—".to_string(),
                };
                println!(
                    "  [{:>8}] {}  last: {}  misses(30d): {}  needs: {}  follow-up: {}",
                    row.tier.label(),
                    row.item.display_name,
                    row.item.last_contact_label(),
                    row.item.misses_30d,
                    row.item.needs_count,
                    follow,
                );
            }
        }
        Some("hotspots") => {
            require_auth(&session).await?;
            let mut map = HotspotMap::new(gateway);
            map.refresh().await?;
            let center = map.center();
            println!(
                "{} cells, {} mappable, center {:.4},{:.4}",
                map.cells().len(),
                map.markers().len(),
                center.0,
                center.1
            );
            for marker in map.markers() {
                println!(
                    "  {} @ {:.4},{:.4}  risk {:.1}  size {}",
                    marker.tier, marker.lat, marker.lon, marker.risk_score, marker.size
                );
            }
        }
        Some("screening") => {
            let notes: Vec<&str> = args.collect();
            if notes.is_empty() {
                usage();
            }
            let verdict = gateway.screening_submit(&notes.join(" ")).await?;
            println!("escalate: {}", verdict.is_escalated);
            println!(
                "reason:   {}",
                verdict.escalation_reason.as_deref().unwrap_or("none")
            );
            println!("next:     {}", verdict.next_steps);
        }
        Some("seed-demo") => {
            require_auth(&session).await?;
            let mut map = HotspotMap::new(gateway);
            map.seed_demo().await?;
            info!(cells = map.cells().len(), "Demo data ready");
            println!("seeded; {} cells computed", map.cells().len());
        }
        _ => usage(),
    }

    Ok(())
}

async fn require_auth(session: &Session) -> Result<()> {
    if !session.is_authenticated().await {
        bail!("not logged in — run `streetlight login <email> <password>` first");
    }
    Ok(())
}
