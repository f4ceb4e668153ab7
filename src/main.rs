// Line-command runner over the dispatch desk.
// Usage: depot_dispatch [config.json] < commands.txt
//
//   register <client> <name> <surname>
//   create <cargo> <yyyy-MM-dd> <status 1|2|3> <client> <city>
//   dispatch
//   recent <client> [n]
//   search <client> <cargo>
//   delivered <client>
//   undelivered <client>
//   tree
//   cities

use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::info;

use depot_dispatch::{
    boundary::{parse_cargo_id, parse_client_id, status_ordinal},
    telemetry, Cargo, CargoService, ClientRepository, CreateCargoRequest, DeskHandle,
    DispatchDesk, ServiceConfig, ShipmentDesk,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => ServiceConfig::from_json_file(path)?,
        None => ServiceConfig::default(),
    }
    .with_env_overrides()?;

    let clients = Arc::new(ClientRepository::new());
    let service = CargoService::from_config(&config, clients)
        .context("failed to build depot network")?;
    let desk = DispatchDesk::spawn(service);
    info!(recent_limit = config.recent_limit, "dispatch desk ready");

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(e) = run_command(&desk, line).await {
            println!("error: {e:#}");
        }
    }

    desk.shutdown().await;
    Ok(())
}

fn print_cargo(cargo: &Cargo) {
    println!(
        "  #{} {} status={} city={} days={}",
        cargo.id,
        cargo.date,
        status_ordinal(cargo.status),
        cargo.destination,
        cargo.delivery_time
    );
}

fn print_all(label: &str, cargo: &[Cargo]) {
    println!("{label}: {}", cargo.len());
    cargo.iter().for_each(print_cargo);
}

async fn run_command(desk: &DeskHandle, line: &str) -> anyhow::Result<()> {
    let args: Vec<&str> = line.split_whitespace().collect();

    match args.as_slice() {
        ["register", id, name, surname] => {
            let profile = desk
                .register(parse_client_id(id)?, name.to_string(), surname.to_string())
                .await?;
            println!("registered {} {} ({})", profile.name, profile.surname, profile.id);
        }
        ["create", id, date, status, client, city] => {
            let request = CreateCargoRequest::parse(id, date, status, client, city)?;
            let cargo = desk.create_cargo(request).await?;
            println!("created cargo {}, delivery in {} day(s)", cargo.id, cargo.delivery_time);
        }
        ["dispatch"] => match desk.dispatch_next().await? {
            Some(cargo) => println!("dispatched cargo {} ({})", cargo.id, cargo.status),
            None => println!("nothing to dispatch"),
        },
        ["recent", client] => {
            let cargo = desk.recent_shipments(parse_client_id(client)?, None).await?;
            print_all("recent", &cargo);
        }
        ["recent", client, n] => {
            let n = n.parse().with_context(|| format!("bad count {n:?}"))?;
            let cargo = desk.recent_shipments(parse_client_id(client)?, Some(n)).await?;
            print_all("recent", &cargo);
        }
        ["search", client, id] => {
            let cargo = desk
                .search_by_id(parse_client_id(client)?, parse_cargo_id(id)?)
                .await?;
            print_cargo(&cargo);
        }
        ["delivered", client] => {
            let cargo = desk.delivered_shipments(parse_client_id(client)?).await?;
            print_all("delivered", &cargo);
        }
        ["undelivered", client] => {
            let cargo = desk.undelivered_shipments(parse_client_id(client)?).await?;
            print_all("undelivered", &cargo);
        }
        ["tree"] => print!("{}", desk.describe_network().await?),
        ["cities"] => {
            for city in desk.cities().await? {
                println!("ID: {}, Name: {}, Depth: {}", city.id, city.name, city.depth);
            }
        }
        _ => bail!("unknown command: {line}"),
    }

    Ok(())
}
