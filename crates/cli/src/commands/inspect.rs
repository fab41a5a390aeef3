//! Lists the prototypes an action catalogue resolves to.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use action_content::ContentFactory;

/// List loaded action prototypes
#[derive(Parser)]
pub struct Inspect {
    /// Data directory holding `config.toml`, `actions/` and `worlds/`
    #[arg(short, long, value_name = "DIR", env = "ACTION_DATA_DIR")]
    data_dir: PathBuf,

    /// Menu text language (defaults to the configured one)
    #[arg(short, long)]
    language: Option<String>,
}

impl Inspect {
    pub fn execute(self) -> Result<()> {
        let content = ContentFactory::new(&self.data_dir);
        let config = content.load_config()?;
        let factory = content
            .load_actions()
            .with_context(|| format!("loading actions from {}", self.data_dir.display()))?;
        let language = self.language.unwrap_or(config.language);

        println!(
            "{} {} ({} prototypes)",
            style("Catalogue:").bold().cyan(),
            content.data_dir().join("actions").display(),
            factory.len()
        );
        for prototype in factory.prototypes() {
            println!();
            println!("{}", style(prototype.name()).bold().green());
            println!("  type:      {}", prototype.action_type());
            println!("  need:      {:?}", prototype.need_mask());
            println!("  priority:  {}", prototype.priority());
            println!("  menu text: {}", prototype.menu_text(&language));
            if let Some(icon) = prototype.menu_icon() {
                println!("  icon:      {icon}");
            }
            for sub in prototype.sub_actions() {
                let text = prototype
                    .sub_menu_text(sub.mode, &language)
                    .unwrap_or_default();
                println!("  mode {:>3}:  {text}", sub.mode);
            }
        }
        Ok(())
    }
}
