use crate::errors::ConfigError;

use std::fs;

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub server: ServerConfig,
    pub shell: ShellSettings,
    pub info: InfoConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// When false, shellport runs a prompt on the local terminal instead
    /// of listening for Telnet connections.
    pub enabled: bool,
    pub bind_address: String,
    pub telnet_port: u16,
    pub max_connections: usize,
}

#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub prompt: String,
    pub line_buffer_size: usize,
    pub history_buffer_size: usize,
}

#[derive(Debug, Clone)]
pub struct InfoConfig {
    pub name: String,
    pub operator: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                enabled: true,
                bind_address: "127.0.0.1".to_string(),
                telnet_port: 2323,
                max_connections: 8,
            },
            shell: ShellSettings {
                prompt: ">".to_string(),
                line_buffer_size: 100,
                history_buffer_size: 1000,
            },
            info: InfoConfig {
                name: "Shellport".to_string(),
                operator: "Operator".to_string(),
            },
        }
    }
}

impl ShellConfig {
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse_config(&content),
            Err(_) => {
                // Create a default config file if it doesn't exist
                let default_config = Self::default();
                let config_content = default_config.to_config_file_format();
                if let Err(e) = fs::write(path, config_content) {
                    eprintln!("Warning: Could not create default config file: {}", e);
                }
                Ok(default_config)
            }
        }
    }

    pub fn parse_config(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (section, key, value) in config_pairs(content) {
            let apply: fn(&mut Self, &str, &str) -> Result<(), ConfigError> = match section {
                "server" => Self::parse_server_config,
                "shell" => Self::parse_shell_config,
                "info" => Self::parse_info_config,
                other => return Err(ConfigError::UnknownSection(other.to_string())),
            };
            apply(&mut config, key, value)?;
        }
        Ok(config)
    }

    fn parse_server_config(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "enabled" => {
                self.server.enabled = parse_bool(key, value)?;
            }
            "bind_address" => {
                self.server.bind_address = value.to_string();
            }
            "telnet_port" => {
                self.server.telnet_port = value.parse().map_err(|_| {
                    ConfigError::InvalidValue(key.to_string(), value.to_string())
                })?;
            }
            "max_connections" => {
                self.server.max_connections = value.parse().map_err(|_| {
                    ConfigError::InvalidValue(key.to_string(), value.to_string())
                })?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn parse_shell_config(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "prompt" => {
                self.shell.prompt = value.to_string();
            }
            "line_buffer_size" => {
                let size: usize = value.parse().map_err(|_| {
                    ConfigError::InvalidValue(key.to_string(), value.to_string())
                })?;
                // One data byte plus the terminator is the useful minimum
                if size < 2 {
                    return Err(ConfigError::InvalidValue(
                        key.to_string(),
                        value.to_string(),
                    ));
                }
                self.shell.line_buffer_size = size;
            }
            "history_buffer_size" => {
                self.shell.history_buffer_size = value.parse().map_err(|_| {
                    ConfigError::InvalidValue(key.to_string(), value.to_string())
                })?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn parse_info_config(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "name" => {
                self.info.name = value.to_string();
            }
            "operator" => {
                self.info.operator = value.to_string();
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn to_config_file_format(&self) -> String {
        format!(
            r#"# Shellport configuration
# Generated automatically - edit as needed

[server]
# Set enabled = false to run a prompt on the local terminal instead
enabled = {}
bind_address = "{}"
telnet_port = {}
max_connections = {}

[shell]
prompt = "{}"
# Sizes in bytes; the line buffer includes its terminator
line_buffer_size = {}
# history_buffer_size = 0 disables history
history_buffer_size = {}

[info]
name = "{}"
operator = "{}"
"#,
            self.server.enabled,
            self.server.bind_address,
            self.server.telnet_port,
            self.server.max_connections,
            self.shell.prompt,
            self.shell.line_buffer_size,
            self.shell.history_buffer_size,
            self.info.name,
            self.info.operator,
        )
    }
}

/// Walk an INI-style document and yield each `key = value` pair together
/// with the name of the section it sits under. Blank lines, `#` comments
/// and lines without an `=` are skipped; quotes around a value are
/// dropped. Pairs above the first section header carry an empty section
/// name, which the caller rejects.
fn config_pairs(content: &str) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
    let mut section = "";
    content.lines().filter_map(move |line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            section = name;
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some((section, key.trim(), value.trim().trim_matches('"')))
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue(
            key.to_string(),
            value.to_string(),
        )),
    }
}
