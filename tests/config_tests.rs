//! Configuration loading: defaults, file parsing and write-back of the
//! generated default file.

use shellport::config::ShellConfig;
use shellport::errors::ConfigError;

#[test]
fn missing_file_creates_a_default_and_loads_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shellport.conf");
    let path_str = path.to_str().unwrap();

    let config = ShellConfig::load_from_file(path_str).unwrap();
    assert_eq!(config.server.telnet_port, 2323);

    // the default file was written and parses back to the same values
    assert!(path.exists());
    let reloaded = ShellConfig::load_from_file(path_str).unwrap();
    assert_eq!(reloaded.server.telnet_port, config.server.telnet_port);
    assert_eq!(reloaded.shell.prompt, config.shell.prompt);
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.conf");
    std::fs::write(
        &path,
        r#"
[server]
enabled = false
telnet_port = 7000

[shell]
prompt = "ship> "
history_buffer_size = 0

[info]
name = "Bridge"
operator = "Kim"
"#,
    )
    .unwrap();

    let config = ShellConfig::load_from_file(path.to_str().unwrap()).unwrap();
    assert!(!config.server.enabled);
    assert_eq!(config.server.telnet_port, 7000);
    assert_eq!(config.shell.prompt, "ship> ");
    assert_eq!(config.shell.history_buffer_size, 0);
    assert_eq!(config.info.name, "Bridge");
    assert_eq!(config.info.operator, "Kim");
}

#[test]
fn bad_values_surface_as_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.conf");
    std::fs::write(&path, "[server]\ntelnet_port = not-a-port\n").unwrap();

    let result = ShellConfig::load_from_file(path.to_str().unwrap());
    assert!(matches!(result, Err(ConfigError::InvalidValue(_, _))));
}

#[test]
fn unknown_sections_surface_as_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.conf");
    std::fs::write(&path, "[mystery]\nkey = value\n").unwrap();

    let result = ShellConfig::load_from_file(path.to_str().unwrap());
    assert!(matches!(result, Err(ConfigError::UnknownSection(_))));
}
