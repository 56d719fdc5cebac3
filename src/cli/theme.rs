//! `sellerdesk theme`

use std::{io, path::PathBuf};

use clap::Args;

use sellerdesk::theme::{FilePreferences, RouteClass, Theme, store_theme, theme_for_path};

use super::CliError;

/// Theme flags.
#[derive(Debug, Args)]
pub struct ThemeArgs {
    /// Route to resolve the theme for
    #[arg(short, long, default_value = "/dashboard")]
    pub route: String,

    /// Store a theme preference (light, dark) before resolving
    #[arg(long, value_name = "THEME")]
    pub set: Option<String>,

    /// Preferences file
    #[arg(long, env = "SELLERDESK_PREFERENCES", default_value = ".sellerdesk.yml")]
    pub preferences: PathBuf,
}

/// Run the theme command.
///
/// # Errors
///
/// Returns a `CliError` for unknown theme names or unusable preference files.
pub fn run(args: &ThemeArgs, mut out: impl io::Write) -> Result<(), CliError> {
    let mut store = FilePreferences::new(&args.preferences);

    if let Some(value) = &args.set {
        let theme = Theme::parse(value).ok_or_else(|| {
            CliError::Usage(format!("unknown theme {value:?}; expected light or dark"))
        })?;

        store_theme(&mut store, theme)?;
    }

    let theme = theme_for_path(&args.route, &store)?;
    let class = match RouteClass::classify(&args.route) {
        RouteClass::Public => "public",
        RouteClass::Dashboard => "dashboard",
    };

    writeln!(out, "{}: {theme} ({class})", args.route)?;

    Ok(())
}
