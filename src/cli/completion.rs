//! Shell integration scripts
//!
//! `gpac-complete init <shell>` prints two things: the clap-generated
//! completion for `gpac-complete` itself, and a hook registering
//! `gpac-complete complete` as the completion function of `gpac`. Candidates
//! carry their own trailing space or separator, so the hook disables the
//! shell's automatic space.

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::Write;

use super::{BIN_NAME, CliArgs};
use crate::error::{CompleterError, ConfigError, Result};

/// Binary whose command lines are completed
const TARGET: &str = "gpac";

/// Write the init script for `shell_name` to `out`
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh)
/// * `out` - Destination of the script
pub fn generate_init(shell_name: &str, out: &mut impl Write) -> Result<()> {
    let shell = parse_shell(shell_name)?;

    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    out.write_all(&buffer)?;

    let hook = match shell {
        Shell::Zsh => format!(
            "\n# gpac completion through {BIN_NAME}\nautoload -U +X bashcompinit && bashcompinit\n{}",
            bash_hook()
        ),
        _ => format!("\n# gpac completion through {BIN_NAME}\n{}", bash_hook()),
    };
    out.write_all(hook.as_bytes())?;
    Ok(())
}

/// Bash completion function for gpac; zsh reuses it through bashcompinit
fn bash_hook() -> String {
    format!(
        r#"_{TARGET}_complete() {{
    local IFS=$'\n'
    COMPREPLY=($({BIN_NAME} complete "${{COMP_POINT}}" "${{COMP_LINE}}" 2>/dev/null))
}}
complete -o nospace -F _{TARGET}_complete {TARGET}
"#
    )
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        _ => Err(CompleterError::Config(ConfigError::InvalidValue {
            field: "shell".to_string(),
            value: format!("{shell_name} (supported shells: bash, zsh)"),
        })),
    }
}
