//! Browser-based debug overlay: a loopback HTTP server exposing the
//! current snapshot as JSON, polled by an embedded canvas page. Read-only
//! observer of the snapshot provider; holds no locks on it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::context::{Ctx, GameReader};
use crate::game::grid::CollisionType;
use crate::game::{Data, MonsterKind, Position};
use crate::nav::label;
use crate::pathing::PathFinder;

const OVERLAY_SCALE: f64 = 2.5;
const OVERLAY_RANGE: i32 = 120;
const MAX_TILES: usize = 5000;
const MAX_POINTS: usize = 80;
const IO_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

const INDEX_HTML: &str = include_str!("assets/index.html");
const OVERLAY_JS: &str = include_str!("assets/overlay.js");
const STYLE_CSS: &str = include_str!("assets/style.css");

// ── Payload ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct OverlayPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlayTile {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub tile_type: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlayPayload {
    pub scale: f64,
    pub tiles: Vec<OverlayTile>,
    pub path: Vec<OverlayPoint>,
    pub objects: Vec<OverlayPoint>,
    pub monsters: Vec<OverlayPoint>,
    pub meta: String,
}

pub(crate) fn within_range(dx: i32, dy: i32) -> bool {
    dx.abs() <= OVERLAY_RANGE && dy.abs() <= OVERLAY_RANGE
}

/// Build the `/data` payload from one snapshot. All coordinates are
/// relative to the player.
pub fn collect_payload(data: &Data, last_path: Option<Vec<Position>>) -> OverlayPayload {
    let mut payload = OverlayPayload {
        scale: OVERLAY_SCALE,
        tiles: Vec::new(),
        path: Vec::new(),
        objects: Vec::new(),
        monsters: Vec::new(),
        meta: "Waiting for game state...".to_string(),
    };

    if !data.is_ingame {
        return payload;
    }

    let player = data.player.position;

    for obj in &data.objects {
        let dx = obj.position.x - player.x;
        let dy = obj.position.y - player.y;
        if !within_range(dx, dy) {
            continue;
        }
        payload.objects.push(OverlayPoint {
            x: dx as f64,
            y: dy as f64,
            size: 2.0,
            kind: label(obj.name).to_string(),
        });
        if payload.objects.len() >= MAX_POINTS {
            break;
        }
    }

    for monster in data.enemies() {
        let dx = monster.position.x - player.x;
        let dy = monster.position.y - player.y;
        if !within_range(dx, dy) {
            continue;
        }
        let size = match monster.kind {
            MonsterKind::Champion | MonsterKind::Unique | MonsterKind::SuperUnique => 3.5,
            _ => 2.5,
        };
        payload.monsters.push(OverlayPoint {
            x: dx as f64,
            y: dy as f64,
            size,
            kind: monster.kind.label().to_string(),
        });
        if payload.monsters.len() >= MAX_POINTS {
            break;
        }
    }

    payload.tiles = collect_tiles(data, player);

    if let Some(path) = last_path {
        for node in path {
            let dx = node.x - player.x;
            let dy = node.y - player.y;
            if !within_range(dx, dy) {
                continue;
            }
            payload.path.push(OverlayPoint {
                x: dx as f64,
                y: dy as f64,
                size: 0.0,
                kind: String::new(),
            });
        }
    }

    let area_name = data
        .area_data
        .area
        .map_or("Unknown", |a| a.name());
    payload.meta = format!(
        "{} | tiles:{} objects:{} monsters:{}",
        area_name,
        payload.tiles.len(),
        payload.objects.len(),
        payload.monsters.len()
    );

    payload
}

fn collect_tiles(data: &Data, player: Position) -> Vec<OverlayTile> {
    let Some(grid) = data.area_data.grid.as_deref() else {
        return Vec::new();
    };

    let mut tiles = Vec::with_capacity(MAX_TILES);

    let start_x = (player.x - OVERLAY_RANGE).max(grid.offset_x);
    let end_x = (player.x + OVERLAY_RANGE).min(grid.offset_x + grid.width as i32 - 1);
    let start_y = (player.y - OVERLAY_RANGE).max(grid.offset_y);
    let end_y = (player.y + OVERLAY_RANGE).min(grid.offset_y + grid.height as i32 - 1);

    'rows: for world_y in start_y..=end_y {
        let row = &grid.cells[(world_y - grid.offset_y) as usize];
        for world_x in start_x..=end_x {
            let cell = row[(world_x - grid.offset_x) as usize];
            // Monster cells are transient combat state, not terrain.
            if cell == CollisionType::Monster {
                continue;
            }
            tiles.push(OverlayTile {
                x: (world_x - player.x) as f64,
                y: (world_y - player.y) as f64,
                tile_type: cell as u8,
            });
            if tiles.len() >= MAX_TILES {
                break 'rows;
            }
        }
    }

    tiles
}

// ── Lifecycle ──────────────────────────────────────────────────────

struct OverlayServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

/// One overlay window per bot supervisor. Start/stop/toggle are safe
/// under concurrent calls.
pub struct DebugOverlay {
    supervisor: String,
    reader: Arc<dyn GameReader>,
    pathfinder: Arc<PathFinder>,
    running: AtomicBool,
    server: Mutex<Option<OverlayServer>>,
}

static INSTANCES: OnceLock<Mutex<HashMap<String, Arc<DebugOverlay>>>> = OnceLock::new();

impl DebugOverlay {
    pub fn new(supervisor: String, reader: Arc<dyn GameReader>, pathfinder: Arc<PathFinder>) -> Self {
        Self {
            supervisor,
            reader,
            pathfinder,
            running: AtomicBool::new(false),
            server: Mutex::new(None),
        }
    }

    /// The per-supervisor instance, deduplicated process-wide.
    pub fn instance(ctx: &Ctx) -> Arc<DebugOverlay> {
        let registry = INSTANCES.get_or_init(|| Mutex::new(HashMap::new()));
        let mut registry = registry.lock().unwrap();
        registry
            .entry(ctx.supervisor.clone())
            .or_insert_with(|| {
                Arc::new(DebugOverlay::new(
                    ctx.supervisor.clone(),
                    ctx.reader(),
                    ctx.pathfinder.clone(),
                ))
            })
            .clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn toggle(&self) -> std::io::Result<()> {
        if self.is_running() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Bind the loopback server on an ephemeral port and log its URL.
    pub fn start(&self) -> std::io::Result<()> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }

        let reader = self.reader.clone();
        let pathfinder = self.pathfinder.clone();
        let supervisor = self.supervisor.clone();

        let (addr_tx, addr_rx) = std::sync::mpsc::channel::<std::io::Result<SocketAddr>>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name(format!("overlay-{supervisor}"))
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_io()
                    .enable_time()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(err) => {
                        let _ = addr_tx.send(Err(err));
                        return;
                    }
                };
                runtime.block_on(serve(reader, pathfinder, addr_tx, shutdown_rx));
            })?;

        let addr = match addr_rx.recv() {
            Ok(Ok(addr)) => addr,
            Ok(Err(err)) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = thread.join();
                return Err(err);
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = thread.join();
                return Err(std::io::Error::other("overlay thread died before binding"));
            }
        };

        *self.server.lock().unwrap() = Some(OverlayServer {
            addr,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        });

        info!(supervisor = %self.supervisor, url = %format!("http://{addr}/"), "overlay started");
        Ok(())
    }

    pub fn stop(&self) {
        if self
            .running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        info!(supervisor = %self.supervisor, "stopping overlay");
        let server = self.server.lock().unwrap().take();
        if let Some(mut server) = server {
            if let Some(shutdown) = server.shutdown.take() {
                let _ = shutdown.send(());
            }
            if let Some(thread) = server.thread.take() {
                let _ = thread.join();
            }
        }
    }

    pub fn url(&self) -> Option<String> {
        self.server
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| format!("http://{}/", s.addr))
    }
}

impl Drop for DebugOverlay {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── HTTP plumbing ──────────────────────────────────────────────────

async fn serve(
    reader: Arc<dyn GameReader>,
    pathfinder: Arc<PathFinder>,
    addr_tx: std::sync::mpsc::Sender<std::io::Result<SocketAddr>>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => {
            let _ = addr_tx.send(Err(err));
            return;
        }
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => {
            let _ = addr_tx.send(Err(err));
            return;
        }
    };
    let _ = addr_tx.send(Ok(addr));

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _)) => {
                        let reader = reader.clone();
                        let pathfinder = pathfinder.clone();
                        tokio::spawn(async move {
                            if let Err(err) = handle_connection(stream, reader, pathfinder).await {
                                debug!(error = %err, "overlay connection error");
                            }
                        });
                    }
                    Err(err) => {
                        error!(error = %err, "overlay accept error");
                    }
                }
            }
            _ = &mut shutdown_rx => {
                break;
            }
        }
    }

    // Grace period for in-flight responses before the runtime drops.
    tokio::time::sleep(SHUTDOWN_GRACE).await;
}

async fn handle_connection(
    mut stream: TcpStream,
    reader: Arc<dyn GameReader>,
    pathfinder: Arc<PathFinder>,
) -> std::io::Result<()> {
    let mut buf = [0u8; 4096];
    let n = tokio::time::timeout(IO_TIMEOUT, stream.read(&mut buf))
        .await
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "read timeout"))??;
    let request = String::from_utf8_lossy(&buf[..n]);

    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    let response = match path {
        "/" | "/index.html" => http_response("200 OK", "text/html; charset=utf-8", INDEX_HTML),
        "/overlay.js" => http_response("200 OK", "application/javascript", OVERLAY_JS),
        "/style.css" => http_response("200 OK", "text/css", STYLE_CSS),
        "/favicon.ico" => "HTTP/1.1 204 No Content\r\n\r\n".to_string(),
        "/data" => {
            let data = reader.snapshot();
            let payload = collect_payload(&data, pathfinder.last_path_debug());
            let body = serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string());
            http_response_with_cache("200 OK", "application/json", &body, "no-store")
        }
        _ => http_response("404 Not Found", "text/plain", "not found"),
    };

    tokio::time::timeout(IO_TIMEOUT, stream.write_all(response.as_bytes()))
        .await
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "write timeout"))??;
    Ok(())
}

fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    )
}

fn http_response_with_cache(status: &str, content_type: &str, body: &str, cache: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nCache-Control: {cache}\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    )
}
