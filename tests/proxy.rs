// ABOUTME: Tests for the nginx configurator using temporary directories.
// ABOUTME: Shell builtins stand in for the validate and reload commands.

mod support;

use std::path::PathBuf;

use dockhand::config::ProxyConfig;
use dockhand::proxy::{ConfigurationError, NginxConfigurator, ProxyConfigurator, Template};

struct Dirs {
    _root: tempfile::TempDir,
    paths: Vec<PathBuf>,
}

fn dirs() -> Dirs {
    let root = tempfile::tempdir().unwrap();
    let paths = ["conf.d", "sites-enabled", "sites-available"]
        .iter()
        .map(|d| {
            let p = root.path().join(d);
            std::fs::create_dir(&p).unwrap();
            p
        })
        .collect();
    Dirs { _root: root, paths }
}

fn argv(cmd: &[&str]) -> Vec<String> {
    cmd.iter().map(|s| s.to_string()).collect()
}

fn proxy_config(dirs: &Dirs, validate: &[&str], reload: &[&str]) -> ProxyConfig {
    ProxyConfig {
        directories: dirs.paths.clone(),
        template: None,
        validate: argv(validate),
        reload: argv(reload),
    }
}

#[tokio::test]
async fn configure_writes_the_same_vhost_everywhere() {
    support::init_tracing();
    let dirs = dirs();
    let proxy =
        NginxConfigurator::new(&proxy_config(&dirs, &["true"], &["true"]), support::DOMAIN).unwrap();
    let name = support::name();

    proxy
        .configure(&name, 8080, 54321, support::PUBLIC_IP)
        .await
        .unwrap();

    let paths = proxy.file_paths(&name);
    assert_eq!(paths.len(), 3);
    let first = std::fs::read_to_string(&paths[0]).unwrap();
    assert!(first.contains(&format!("server_name {};", name.hostname(support::DOMAIN))));
    assert!(first.contains("proxy_pass http://127.0.0.1:54321"));
    for path in &paths[1..] {
        assert_eq!(std::fs::read_to_string(path).unwrap(), first);
    }
}

#[tokio::test]
async fn configure_replaces_a_stale_file() {
    let dirs = dirs();
    let proxy =
        NginxConfigurator::new(&proxy_config(&dirs, &["true"], &["true"]), support::DOMAIN).unwrap();
    let name = support::name();
    let stale = dirs.paths[0].join(name.config_file_name());
    std::fs::write(&stale, "stale").unwrap();

    proxy
        .configure(&name, 8080, 40000, support::PUBLIC_IP)
        .await
        .unwrap();

    assert!(std::fs::read_to_string(&stale).unwrap().contains("40000"));
}

#[tokio::test]
async fn failed_validation_leaves_files_and_reports_stderr() {
    let dirs = dirs();
    let config = proxy_config(
        &dirs,
        &["sh", "-c", "echo 'unknown directive \"proxy_pas\"' >&2; exit 1"],
        &["true"],
    );
    let proxy = NginxConfigurator::new(&config, support::DOMAIN).unwrap();
    let name = support::name();

    let err = proxy
        .configure(&name, 8080, 40000, support::PUBLIC_IP)
        .await
        .unwrap_err();

    match err {
        ConfigurationError::Validate { stderr, .. } => {
            assert!(stderr.contains("unknown directive"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(proxy.file_paths(&name).iter().all(|p| p.exists()));
}

#[tokio::test]
async fn failed_reload_is_its_own_error() {
    let dirs = dirs();
    let proxy =
        NginxConfigurator::new(&proxy_config(&dirs, &["true"], &["false"]), support::DOMAIN).unwrap();

    let err = proxy
        .configure(&support::name(), 8080, 40000, support::PUBLIC_IP)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::Reload { .. }));
}

#[tokio::test]
async fn missing_directory_is_a_write_error() {
    let dirs = dirs();
    let mut config = proxy_config(&dirs, &["true"], &["true"]);
    config.directories.push(dirs.paths[0].join("does-not-exist"));
    let proxy = NginxConfigurator::new(&config, support::DOMAIN).unwrap();

    let err = proxy
        .configure(&support::name(), 8080, 40000, support::PUBLIC_IP)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::Write { .. }));
}

#[tokio::test]
async fn unknown_command_is_a_spawn_error() {
    let dirs = dirs();
    let config = proxy_config(&dirs, &["dockhand-no-such-binary"], &["true"]);
    let proxy = NginxConfigurator::new(&config, support::DOMAIN).unwrap();

    let err = proxy
        .configure(&support::name(), 8080, 40000, support::PUBLIC_IP)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::Spawn { .. }));
}

#[tokio::test]
async fn remove_deletes_files_and_tolerates_missing_ones() {
    let dirs = dirs();
    let proxy =
        NginxConfigurator::new(&proxy_config(&dirs, &["true"], &["true"]), support::DOMAIN).unwrap();
    let name = support::name();
    proxy
        .configure(&name, 8080, 40000, support::PUBLIC_IP)
        .await
        .unwrap();
    std::fs::remove_file(&proxy.file_paths(&name)[1]).unwrap();

    proxy.remove(&name).await.unwrap();
    assert!(proxy.file_paths(&name).iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn custom_template_is_used() {
    let dirs = dirs();
    let config = proxy_config(&dirs, &[], &["true"]);
    let proxy = NginxConfigurator::with_template(
        &config,
        support::DOMAIN,
        Template::new("# {{name}} -> {{hostPort}}\n"),
    );
    let name = support::name();

    proxy
        .configure(&name, 8080, 40123, support::PUBLIC_IP)
        .await
        .unwrap();

    let written = std::fs::read_to_string(&proxy.file_paths(&name)[2]).unwrap();
    assert_eq!(written, format!("# {name} -> 40123\n"));
}

#[tokio::test]
async fn template_file_is_read_when_loaded_not_when_rendered() {
    let dirs = dirs();
    let template_path = dirs._root.path().join("vhost.conf");
    std::fs::write(&template_path, "server_name {{name}}.{{domain}};\n").unwrap();
    let mut config = proxy_config(&dirs, &[], &["true"]);
    config.template = Some(template_path.clone());

    let template = NginxConfigurator::load_template(&config).unwrap();
    std::fs::remove_file(&template_path).unwrap();
    let proxy = NginxConfigurator::with_template(&config, support::DOMAIN, template);
    let name = support::name();

    proxy
        .configure(&name, 8080, 40124, support::PUBLIC_IP)
        .await
        .unwrap();

    let written = std::fs::read_to_string(&proxy.file_paths(&name)[0]).unwrap();
    assert_eq!(written, format!("server_name {name}.{};\n", support::DOMAIN));
}

#[test]
fn missing_template_file_fails_at_load() {
    let dirs = dirs();
    let mut config = proxy_config(&dirs, &[], &["true"]);
    config.template = Some(dirs._root.path().join("absent.conf"));
    assert!(NginxConfigurator::load_template(&config).is_err());

    let yaml = format!(
        "domain: apps.example.com\npublic_ip: 203.0.113.7\ndns:\n  zone_id: z\n  email: e\n  api_key: k\nproxy:\n  template: {}\n",
        dirs._root.path().join("absent.conf").display()
    );
    let config = dockhand::config::Config::from_yaml(&yaml).unwrap();
    assert!(dockhand::deploy::LiveComponents::new(std::sync::Arc::new(config)).is_err());
}
