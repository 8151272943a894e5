use crate::parser::ParserRegistry;
use crate::report::{Align, TextTable};
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum ListCmd {
    /// List available log parsers
    Parsers {
        /// Include aliases
        #[arg(short, long)]
        all: bool,
    },
}

pub fn run(cmd: ListCmd) -> Result<()> {
    match cmd {
        ListCmd::Parsers { all } => {
            print!("{}", render_parsers(&ParserRegistry::builtin(), all));
            Ok(())
        }
    }
}

pub fn render_parsers(registry: &ParserRegistry, all: bool) -> String {
    let mut table = TextTable::new(&[("Name", Align::Left), ("Description", Align::Left)]);
    for meta in registry.list(all) {
        table.push(
            vec![meta.name.to_string(), meta.description.to_string()],
            Vec::new(),
        );
    }
    table.render(false)
}
