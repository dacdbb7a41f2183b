//! Minimal in-process stand-in for the social backend, enough to drive the
//! harness end to end: thread-per-connection, one request per connection,
//! canned JSON bodies and a call log for assertions.
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: String,
    pub route: String,
}

#[derive(Debug, Default)]
pub struct ServerOptions {
    /// Signups for these aliases get a 409.
    pub reject_signup_aliases: Vec<String>,
    /// After this many upload attempts, every further upload gets a 500.
    pub fail_uploads_after: Option<u64>,
}

#[derive(Debug, Clone)]
struct Account {
    alias: String,
    email: String,
    password: String,
}

struct ServerState {
    options: ServerOptions,
    accounts: Mutex<Vec<Account>>,
    refresh_tokens: Mutex<HashSet<String>>,
    token_counter: AtomicU64,
    upload_attempts: AtomicU64,
    media_counter: AtomicU64,
    post_counter: AtomicU64,
    calls: Mutex<Vec<Call>>,
}

pub struct DiscoServer {
    base_url: String,
    state: Arc<ServerState>,
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for DiscoServer {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

impl DiscoServer {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state
            .calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, method: &str, route: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method && call.route == route)
            .count()
    }

    pub fn count_prefix(&self, method: &str, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method && call.route.starts_with(prefix))
            .count()
    }
}

/// Spawns the mock backend on an ephemeral port.
pub fn spawn_disco_server(options: ServerOptions) -> Result<DiscoServer, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {err}"))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {err}"))?;

    let state = Arc::new(ServerState {
        options,
        accounts: Mutex::new(Vec::new()),
        refresh_tokens: Mutex::new(HashSet::new()),
        token_counter: AtomicU64::new(0),
        upload_attempts: AtomicU64::new(0),
        media_counter: AtomicU64::new(0),
        post_counter: AtomicU64::new(0),
        calls: Mutex::new(Vec::new()),
    });

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let accept_state = Arc::clone(&state);
    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            match listener.accept() {
                Ok((stream, _)) => {
                    let state = Arc::clone(&accept_state);
                    thread::spawn(move || handle_client(stream, &state));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok(DiscoServer {
        base_url: format!("http://{addr}"),
        state,
        shutdown: shutdown_tx,
        thread: Some(handle),
    })
}

fn handle_client(stream: TcpStream, state: &Arc<ServerState>) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_owned();
    let target = parts.next().unwrap_or_default().to_owned();

    let mut content_length = 0usize;
    let mut authorized = false;
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => return,
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name == "content-length" {
                content_length = value.parse().unwrap_or(0);
            }
            if name == "authorization" && value.starts_with("Bearer ") {
                authorized = true;
            }
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).is_err() {
        return;
    }
    let body = String::from_utf8_lossy(&body).into_owned();

    let (route, query) = match target.split_once('?') {
        Some((route, query)) => (route.to_owned(), query.to_owned()),
        None => (target.clone(), String::new()),
    };
    if let Ok(mut calls) = state.calls.lock() {
        calls.push(Call {
            method: method.clone(),
            route: route.clone(),
        });
    }

    let (status, payload) = respond(state, &method, &route, &query, &body, authorized);
    let reason = match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        _ => "Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let mut stream = reader.into_inner();
    let _write_result = stream.write_all(response.as_bytes());
    let _flush_result = stream.flush();
}

fn respond(
    state: &ServerState,
    method: &str,
    route: &str,
    query: &str,
    body: &str,
    authorized: bool,
) -> (u16, String) {
    match (method, route) {
        ("POST", "/api/users/auth/signup") => signup(state, body),
        ("POST", "/api/users/auth/login") => login(state, query, body),
        ("POST", "/api/media/upload") => {
            if !authorized {
                return unauthorized();
            }
            upload(state)
        }
        ("POST", "/api/posts/new") => {
            if !authorized {
                return unauthorized();
            }
            let id = state
                .post_counter
                .fetch_add(1, Ordering::SeqCst)
                .saturating_add(1);
            (
                201,
                format!(
                    r#"{{"status":"Created","message":"Post created","post_id":"post-{id}"}}"#
                ),
            )
        }
        ("POST", "/api/users/update/password") => {
            if !authorized {
                return unauthorized();
            }
            change_password(state, body)
        }
        ("POST", "/api/users/update") | ("POST", "/api/users/update/avatar") => {
            if !authorized {
                return unauthorized();
            }
            ok_message("Updated")
        }
        ("GET", "/api/users/") => {
            if !authorized {
                return unauthorized();
            }
            (200, r#"{"alias":"someone","posts":[]}"#.to_owned())
        }
        ("DELETE", "/api/users/") => {
            if !authorized {
                return unauthorized();
            }
            ok_message("User deleted")
        }
        ("GET", "/api/sessions/") => {
            if !authorized {
                return unauthorized();
            }
            (200, r#"[{"id":"session-1"}]"#.to_owned())
        }
        ("POST", "/api/sessions/delete") => {
            if !authorized {
                return unauthorized();
            }
            (200, r#"{"deleted":4}"#.to_owned())
        }
        ("GET", "/api/search") => (200, r#"{"users":[],"posts":[]}"#.to_owned()),
        ("GET", route) if route.starts_with("/api/media/") => {
            if !authorized {
                return unauthorized();
            }
            (200, r#"{"status":"Waiting"}"#.to_owned())
        }
        ("GET", route) if route.starts_with("/api/posts/") => {
            (200, r#"{"title":"Smoke post","visibility":"Public"}"#.to_owned())
        }
        ("PATCH", route) if route.starts_with("/api/posts/") => {
            if !authorized {
                return unauthorized();
            }
            ok_message("Updated")
        }
        ("DELETE", route) if route.starts_with("/api/posts/") => {
            if !authorized {
                return unauthorized();
            }
            ok_message("Deleted")
        }
        ("GET", route) if route.starts_with("/api/users/") && route.ends_with("/posts") => {
            (200, "[]".to_owned())
        }
        ("GET", route) if route.starts_with("/api/users/") => {
            (200, r#"{"alias":"someone"}"#.to_owned())
        }
        _ => (
            404,
            r#"{"status":"NotFound","message":"no such route"}"#.to_owned(),
        ),
    }
}

fn ok_message(message: &str) -> (u16, String) {
    (200, format!(r#"{{"status":"Ok","message":"{message}"}}"#))
}

fn unauthorized() -> (u16, String) {
    (
        401,
        r#"{"status":"Unauthorized","message":"missing bearer token"}"#.to_owned(),
    )
}

fn field<'doc>(value: &'doc serde_json::Value, name: &str) -> Option<&'doc str> {
    value.get(name).and_then(serde_json::Value::as_str)
}

fn signup(state: &ServerState, body: &str) -> (u16, String) {
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
        return (400, r#"{"status":"BadRequest","message":"bad json"}"#.to_owned());
    };
    let alias = field(&parsed, "alias").unwrap_or_default().to_owned();
    let email = field(&parsed, "email").unwrap_or_default().to_owned();
    let password = field(&parsed, "password").unwrap_or_default().to_owned();

    if state.options.reject_signup_aliases.contains(&alias) {
        return (
            409,
            r#"{"status":"Conflict","message":"Alias taken"}"#.to_owned(),
        );
    }
    let Ok(mut accounts) = state.accounts.lock() else {
        return server_error();
    };
    if accounts.iter().any(|account| account.alias == alias) {
        return (
            409,
            r#"{"status":"Conflict","message":"Alias taken"}"#.to_owned(),
        );
    }
    accounts.push(Account {
        alias,
        email,
        password,
    });
    (
        201,
        r#"{"status":"Created","message":"User created"}"#.to_owned(),
    )
}

fn login(state: &ServerState, query: &str, body: &str) -> (u16, String) {
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
        return (400, r#"{"status":"BadRequest","message":"bad json"}"#.to_owned());
    };
    let using = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("using="))
        .unwrap_or("alias");

    let matched = match using {
        "refresh_token" => {
            let token = field(&parsed, "refresh_token").unwrap_or_default();
            state
                .refresh_tokens
                .lock()
                .map(|tokens| tokens.contains(token))
                .unwrap_or(false)
        }
        "email" => {
            let email = field(&parsed, "email").unwrap_or_default();
            let password = field(&parsed, "password").unwrap_or_default();
            state
                .accounts
                .lock()
                .map(|accounts| {
                    accounts
                        .iter()
                        .any(|account| account.email == email && account.password == password)
                })
                .unwrap_or(false)
        }
        _ => {
            let alias = field(&parsed, "alias").unwrap_or_default();
            let password = field(&parsed, "password").unwrap_or_default();
            state
                .accounts
                .lock()
                .map(|accounts| {
                    accounts
                        .iter()
                        .any(|account| account.alias == alias && account.password == password)
                })
                .unwrap_or(false)
        }
    };
    if !matched {
        return (
            403,
            r#"{"status":"Forbidden","message":"invalid credentials"}"#.to_owned(),
        );
    }

    let id = state
        .token_counter
        .fetch_add(1, Ordering::SeqCst)
        .saturating_add(1);
    let refresh_token = format!("rt-{id}");
    if let Ok(mut tokens) = state.refresh_tokens.lock() {
        tokens.insert(refresh_token.clone());
    }
    (
        200,
        format!(
            r#"{{"access_token":"at-{id}","token_type":"Bearer","expires_in":900,"refresh_token":"{refresh_token}","scope":"User login"}}"#
        ),
    )
}

fn change_password(state: &ServerState, body: &str) -> (u16, String) {
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
        return (400, r#"{"status":"BadRequest","message":"bad json"}"#.to_owned());
    };
    let old = field(&parsed, "password").unwrap_or_default();
    let new = field(&parsed, "new_password").unwrap_or_default().to_owned();
    let Ok(mut accounts) = state.accounts.lock() else {
        return server_error();
    };
    let Some(account) = accounts.iter_mut().find(|account| account.password == old) else {
        return (
            403,
            r#"{"status":"Forbidden","message":"wrong password"}"#.to_owned(),
        );
    };
    account.password = new;
    ok_message("Password updated")
}

fn upload(state: &ServerState) -> (u16, String) {
    let attempt = state
        .upload_attempts
        .fetch_add(1, Ordering::SeqCst)
        .saturating_add(1);
    if let Some(limit) = state.options.fail_uploads_after {
        if attempt > limit {
            return server_error();
        }
    }
    let id = state
        .media_counter
        .fetch_add(1, Ordering::SeqCst)
        .saturating_add(1);
    (200, format!(r#"{{"key":"media-{id}","TTL":60}}"#))
}

fn server_error() -> (u16, String) {
    (
        500,
        r#"{"status":"InternalServerError","message":"media store unavailable"}"#.to_owned(),
    )
}
