//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::app::options::{AppOptions, LifecycleOptions, ServerOptions};
use crate::cache::directory::SimDirectory;
use crate::errors::SwitchError;
use crate::provider::http::HttpRegistry;
use crate::provider::SimRegistry;
use crate::reconcile::reconciler::SimReconciler;
use crate::server::serve::serve;
use crate::server::state::ServerState;

/// Run the simswitch service
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), SwitchError> {
    info!("Initializing simswitch...");

    // Create shutdown channel
    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager =
        ShutdownManager::new(shutdown_tx.clone(), options.lifecycle.clone());

    if let Err(e) = init(options, shutdown_tx.clone(), &mut shutdown_manager).await {
        error!("Failed to start service: {}", e);
        shutdown_manager.shutdown().await?;
        return Err(e);
    }

    tokio::select! {
        _ = shutdown_signal => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    // Shutdown
    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

// =============================== INITIALIZATION ================================== //

async fn init(
    options: AppOptions,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<(), SwitchError> {
    let AppOptions {
        server,
        provider,
        cache_ttl,
        ..
    } = options;

    let registry: Arc<dyn SimRegistry> = Arc::new(HttpRegistry::new(provider)?);
    let directory = Arc::new(SimDirectory::new(Arc::clone(&registry), cache_ttl));
    let reconciler = Arc::new(SimReconciler::new(
        Arc::clone(&registry),
        Arc::clone(&directory),
    ));

    init_socket_server(
        &server,
        ServerState::new(registry, directory, reconciler),
        shutdown_manager,
        shutdown_tx.subscribe(),
    )
    .await
}

async fn init_socket_server(
    options: &ServerOptions,
    server_state: ServerState,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), SwitchError> {
    info!("Initializing HTTP server...");

    let server_handle = serve(options, Arc::new(server_state), async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_socket_server_handle(server_handle)?;
    Ok(())
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    lifecycle_options: LifecycleOptions,
    socket_server_handle: Option<JoinHandle<Result<(), SwitchError>>>,
}

impl ShutdownManager {
    pub fn new(shutdown_tx: broadcast::Sender<()>, lifecycle_options: LifecycleOptions) -> Self {
        Self {
            shutdown_tx,
            lifecycle_options,
            socket_server_handle: None,
        }
    }

    pub fn with_socket_server_handle(
        &mut self,
        handle: JoinHandle<Result<(), SwitchError>>,
    ) -> Result<(), SwitchError> {
        if self.socket_server_handle.is_some() {
            return Err(SwitchError::ShutdownError(
                "server_handle already set".to_string(),
            ));
        }
        self.socket_server_handle = Some(handle);
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), SwitchError> {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(
            self.lifecycle_options.max_shutdown_delay,
            self.shutdown_impl(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}, forcing shutdown...",
                    self.lifecycle_options.max_shutdown_delay
                );
                std::process::exit(1);
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), SwitchError> {
        info!("Shutting down simswitch...");

        if let Some(handle) = self.socket_server_handle.take() {
            handle
                .await
                .map_err(|e| SwitchError::ShutdownError(e.to_string()))??;
        }

        info!("Shutdown complete");
        Ok(())
    }
}
