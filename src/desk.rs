// Dispatch Desk: a single task owns the cargo service and serves requests from
// any number of async callers over a channel, one at a time

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::{
    boundary::CreateCargoRequest,
    cargo::{Cargo, CargoId, ClientId},
    city_network::CitySummary,
    clients::ClientProfile,
    error::{DispatchError, Result},
    service::CargoService,
};

pub const DEFAULT_DESK_CAPACITY: usize = 64;

// Async surface offered to presentation layers
#[async_trait]
pub trait ShipmentDesk: Send + Sync + 'static {
    async fn register(&self, id: ClientId, name: String, surname: String) -> Result<ClientProfile>;

    async fn login(&self, id: ClientId) -> Result<ClientProfile>;

    async fn create_cargo(&self, request: CreateCargoRequest) -> Result<Cargo>;

    // Ok(None) when there is nothing to dispatch
    async fn dispatch_next(&self) -> Result<Option<Cargo>>;

    // `None` uses the configured default count
    async fn recent_shipments(&self, client: ClientId, n: Option<usize>) -> Result<Vec<Cargo>>;

    async fn search_by_id(&self, client: ClientId, id: CargoId) -> Result<Cargo>;

    async fn delivered_shipments(&self, client: ClientId) -> Result<Vec<Cargo>>;

    async fn undelivered_shipments(&self, client: ClientId) -> Result<Vec<Cargo>>;

    async fn describe_network(&self) -> Result<String>;

    async fn cities(&self) -> Result<Vec<CitySummary>>;
}

enum Command {
    Register {
        id: ClientId,
        name: String,
        surname: String,
        reply: oneshot::Sender<Result<ClientProfile>>,
    },
    Login {
        id: ClientId,
        reply: oneshot::Sender<Result<ClientProfile>>,
    },
    Create {
        request: CreateCargoRequest,
        reply: oneshot::Sender<Result<Cargo>>,
    },
    Dispatch {
        reply: oneshot::Sender<Option<Cargo>>,
    },
    Recent {
        client: ClientId,
        n: Option<usize>,
        reply: oneshot::Sender<Result<Vec<Cargo>>>,
    },
    Search {
        client: ClientId,
        id: CargoId,
        reply: oneshot::Sender<Result<Cargo>>,
    },
    Delivered {
        client: ClientId,
        reply: oneshot::Sender<Result<Vec<Cargo>>>,
    },
    Undelivered {
        client: ClientId,
        reply: oneshot::Sender<Result<Vec<Cargo>>>,
    },
    Describe {
        reply: oneshot::Sender<String>,
    },
    Cities {
        reply: oneshot::Sender<Vec<CitySummary>>,
    },
    Shutdown,
}

pub struct DispatchDesk {
    service: CargoService,
    rx: mpsc::Receiver<Command>,
}

impl DispatchDesk {
    pub fn spawn(service: CargoService) -> DeskHandle {
        Self::spawn_with_capacity(service, DEFAULT_DESK_CAPACITY)
    }

    pub fn spawn_with_capacity(service: CargoService, capacity: usize) -> DeskHandle {
        let (tx, rx) = mpsc::channel(capacity);
        let desk = DispatchDesk { service, rx };

        tokio::spawn(async move {
            desk.run().await;
        });

        DeskHandle { tx }
    }

    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            if !self.handle(command) {
                break;
            }
        }
        debug!("dispatch desk stopped");
    }

    // A caller that went away before its reply is simply ignored
    fn handle(&self, command: Command) -> bool {
        let service = &self.service;

        match command {
            Command::Register {
                id,
                name,
                surname,
                reply,
            } => {
                let _ = reply.send(service.clients().register(id, name, surname));
            }
            Command::Login { id, reply } => {
                let _ = reply.send(service.clients().login(id));
            }
            Command::Create { request, reply } => {
                let _ = reply.send(service.create_cargo(request));
            }
            Command::Dispatch { reply } => {
                let _ = reply.send(service.dispatch_next());
            }
            Command::Recent { client, n, reply } => {
                let n = n.unwrap_or(service.recent_limit());
                let _ = reply.send(service.recent_shipments(client, n));
            }
            Command::Search { client, id, reply } => {
                let _ = reply.send(service.search_by_id(client, id));
            }
            Command::Delivered { client, reply } => {
                let _ = reply.send(service.delivered_shipments(client));
            }
            Command::Undelivered { client, reply } => {
                let _ = reply.send(service.undelivered_shipments(client));
            }
            Command::Describe { reply } => {
                let _ = reply.send(service.describe_network());
            }
            Command::Cities { reply } => {
                let _ = reply.send(service.cities());
            }
            Command::Shutdown => return false,
        }

        true
    }
}

#[derive(Clone)]
pub struct DeskHandle {
    tx: mpsc::Sender<Command>,
}

impl DeskHandle {
    async fn call<T: Send>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command + Send,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| DispatchError::DeskClosed)?;
        rx.await.map_err(|_| DispatchError::DeskClosed)
    }

    // Stops the desk after the commands already queued; later calls get DeskClosed
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown).await;
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
impl ShipmentDesk for DeskHandle {
    async fn register(&self, id: ClientId, name: String, surname: String) -> Result<ClientProfile> {
        self.call(|reply| Command::Register {
            id,
            name,
            surname,
            reply,
        })
        .await?
    }

    async fn login(&self, id: ClientId) -> Result<ClientProfile> {
        self.call(|reply| Command::Login { id, reply }).await?
    }

    async fn create_cargo(&self, request: CreateCargoRequest) -> Result<Cargo> {
        self.call(|reply| Command::Create { request, reply }).await?
    }

    async fn dispatch_next(&self) -> Result<Option<Cargo>> {
        self.call(|reply| Command::Dispatch { reply }).await
    }

    async fn recent_shipments(&self, client: ClientId, n: Option<usize>) -> Result<Vec<Cargo>> {
        self.call(|reply| Command::Recent { client, n, reply }).await?
    }

    async fn search_by_id(&self, client: ClientId, id: CargoId) -> Result<Cargo> {
        self.call(|reply| Command::Search { client, id, reply }).await?
    }

    async fn delivered_shipments(&self, client: ClientId) -> Result<Vec<Cargo>> {
        self.call(|reply| Command::Delivered { client, reply }).await?
    }

    async fn undelivered_shipments(&self, client: ClientId) -> Result<Vec<Cargo>> {
        self.call(|reply| Command::Undelivered { client, reply }).await?
    }

    async fn describe_network(&self) -> Result<String> {
        self.call(|reply| Command::Describe { reply }).await
    }

    async fn cities(&self) -> Result<Vec<CitySummary>> {
        self.call(|reply| Command::Cities { reply }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        boundary::parse_date,
        cargo::{CityId, Status},
        city_network::CityNetwork,
        clients::ClientRepository,
    };
    use futures::future::join_all;
    use std::sync::Arc;

    fn desk() -> DeskHandle {
        let service = CargoService::new(
            CityNetwork::bootstrap(),
            Arc::new(ClientRepository::new()),
        );
        DispatchDesk::spawn(service)
    }

    fn request(id: u32, date: &str, client: ClientId, city: u32) -> CreateCargoRequest {
        CreateCargoRequest::new(
            CargoId(id),
            parse_date(date).unwrap(),
            Status::Processing,
            client,
            CityId(city),
        )
    }

    #[tokio::test]
    async fn test_desk_round_trip() {
        let desk = desk();
        let client = ClientId(1);

        desk.register(client, "Zeynep".into(), "Arslan".into())
            .await
            .unwrap();
        assert_eq!(desk.login(client).await.unwrap().name, "Zeynep");

        // Same cargo set as the dispatch ordering example: A(3 days), B(1), C(2)
        desk.create_cargo(request(1, "2024-01-01", client, 4)).await.unwrap();
        desk.create_cargo(request(2, "2024-03-01", client, 1)).await.unwrap();
        desk.create_cargo(request(3, "2024-02-01", client, 3)).await.unwrap();

        let order: Vec<_> = [
            desk.dispatch_next().await.unwrap(),
            desk.dispatch_next().await.unwrap(),
            desk.dispatch_next().await.unwrap(),
        ]
        .into_iter()
        .map(|c| c.unwrap().id.0)
        .collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(desk.dispatch_next().await.unwrap(), None);

        let recent = desk.recent_shipments(client, Some(2)).await.unwrap();
        assert_eq!(
            recent.iter().map(|c| c.date.to_string()).collect::<Vec<_>>(),
            vec!["2024-03-01", "2024-02-01"]
        );
        assert_eq!(desk.recent_shipments(client, None).await.unwrap().len(), 3);
        assert_eq!(desk.delivered_shipments(client).await.unwrap().len(), 3);
        assert!(desk.undelivered_shipments(client).await.unwrap().is_empty());
        assert_eq!(
            desk.search_by_id(client, CargoId(3)).await.unwrap().status,
            Status::Delivered
        );
        assert!(desk.describe_network().await.unwrap().contains("Cargo ID: 1"));
        assert_eq!(desk.cities().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_desk_reports_errors() {
        let desk = desk();

        let err = desk
            .create_cargo(request(1, "2024-01-01", ClientId(9), 1))
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::ClientNotFound(ClientId(9)));

        desk.register(ClientId(9), "A".into(), "B".into()).await.unwrap();
        let err = desk
            .create_cargo(request(1, "2024-01-01", ClientId(9), 404))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(desk.recent_shipments(ClientId(9), None).await.unwrap().is_empty());
        assert_eq!(desk.dispatch_next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_callers() {
        let desk = desk();
        for id in 1..=4 {
            desk.register(ClientId(id), format!("c{id}"), "x".into())
                .await
                .unwrap();
        }

        let creates = (0..40u32).map(|i| {
            let desk = desk.clone();
            async move {
                desk.create_cargo(request(i, "2024-05-01", ClientId(1 + i % 4), 1 + i % 5))
                    .await
            }
        });
        let results = join_all(creates).await;
        assert!(results.iter().all(|r| r.is_ok()));

        let mut last = 0;
        let mut count = 0;
        while let Some(cargo) = desk.dispatch_next().await.unwrap() {
            assert!(cargo.delivery_time >= last);
            last = cargo.delivery_time;
            count += 1;
        }
        assert_eq!(count, 40);
        for id in 1..=4 {
            assert_eq!(desk.login(ClientId(id)).await.unwrap().shipments, 10);
        }
    }

    #[tokio::test]
    async fn test_shutdown_closes_desk() {
        let desk = desk();
        desk.shutdown().await;

        let err = desk.login(ClientId(1)).await.unwrap_err();
        assert_eq!(err, DispatchError::DeskClosed);
        assert!(desk.is_closed());
    }

    #[test]
    fn test_desk_from_blocking_code() {
        tokio_test::block_on(async {
            let desk = desk();
            desk.register(ClientId(3), "Ali".into(), "Veli".into())
                .await
                .unwrap();
            assert_eq!(desk.login(ClientId(3)).await.unwrap().shipments, 0);
        });
    }
}
