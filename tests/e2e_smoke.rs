mod support_disco;

use std::path::Path;
use std::process::{Command, Output};

use support_disco::{ServerOptions, spawn_disco_server};
use tempfile::tempdir;

fn seed_resources(root: &Path) -> Result<(), String> {
    for pool in ["audio", "images"] {
        let dir = root.join("resources").join(pool);
        std::fs::create_dir_all(&dir).map_err(|err| format!("create {pool} pool: {err}"))?;
        std::fs::write(dir.join("sample.bin"), b"test-bytes")
            .map_err(|err| format!("seed {pool}: {err}"))?;
    }
    Ok(())
}

fn run_stampede(cwd: &Path, args: &[&str]) -> Result<Output, String> {
    Command::new(env!("CARGO_BIN_EXE_stampede"))
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "error")
        .output()
        .map_err(|err| format!("run stampede failed: {err}"))
}

#[test]
fn the_smoke_sweep_walks_the_whole_surface() -> Result<(), String> {
    let server = spawn_disco_server(ServerOptions::default())?;
    let dir = tempdir().map_err(|err| err.to_string())?;
    seed_resources(dir.path())?;

    let output = run_stampede(dir.path(), &["smoke", "-u", server.base_url()])?;
    if !output.status.success() {
        return Err(format!(
            "status: {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    // Every endpoint family must have been exercised at least once.
    let expectations: [(&str, &str); 13] = [
        ("POST", "/api/users/auth/signup"),
        ("POST", "/api/users/auth/login"),
        ("GET", "/api/users/"),
        ("POST", "/api/users/update/password"),
        ("POST", "/api/users/update"),
        ("POST", "/api/users/update/avatar"),
        ("DELETE", "/api/users/"),
        ("POST", "/api/media/upload"),
        ("POST", "/api/posts/new"),
        ("GET", "/api/sessions/"),
        ("POST", "/api/sessions/delete"),
        ("GET", "/api/search"),
        ("GET", "/api/media/"),
    ];
    for (method, prefix) in expectations {
        if server.count_prefix(method, prefix) == 0 {
            return Err(format!("{method} {prefix} was never called"));
        }
    }
    if server.count_prefix("PATCH", "/api/posts/") != 1 {
        return Err("expected exactly one post edit".to_owned());
    }
    if server.count_prefix("DELETE", "/api/posts/") != 1 {
        return Err("expected exactly one post deletion".to_owned());
    }
    if server.count_prefix("GET", "/api/posts/") != 1 {
        return Err("expected exactly one post read".to_owned());
    }
    if !server
        .calls()
        .iter()
        .any(|call| call.method == "GET" && call.route.ends_with("/posts"))
    {
        return Err("posts-by-user was never called".to_owned());
    }

    // Three uploads: avatar image, post image, post audio. Nine logins:
    // email, alias, stale-password attempt, new password, refresh, three
    // session-churn logins, one after the purge.
    if server.count("POST", "/api/media/upload") != 3 {
        return Err(format!("unexpected upload count: {:?}", server.calls()));
    }
    if server.count("POST", "/api/users/auth/login") != 9 {
        return Err(format!("unexpected login count: {:?}", server.calls()));
    }
    Ok(())
}

#[test]
fn the_smoke_sweep_fails_fast_when_uploads_are_down() -> Result<(), String> {
    let server = spawn_disco_server(ServerOptions {
        reject_signup_aliases: Vec::new(),
        fail_uploads_after: Some(0),
    })?;
    let dir = tempdir().map_err(|err| err.to_string())?;
    seed_resources(dir.path())?;

    let output = run_stampede(dir.path(), &["smoke", "-u", server.base_url()])?;
    if output.status.success() {
        return Err("expected the sweep to fail when uploads are down".to_owned());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("avatar image upload") {
        return Err(format!("expected the failing check to be named, got:\n{stderr}"));
    }
    // The sweep stops at its first failure: nothing past the upload runs.
    if server.count("POST", "/api/posts/new") != 0 {
        return Err(format!("unexpected post calls: {:?}", server.calls()));
    }
    Ok(())
}
