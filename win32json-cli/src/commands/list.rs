use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use win32json::typesystem::GraphBuilder;

use crate::{
    app::GlobalOptions,
    commands::common::load_winmd,
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct GroupEntry {
    api: String,
    namespace: String,
    types: usize,
    constants: usize,
    functions: usize,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    groups: Vec<GroupEntry>,
    count: usize,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let winmd = load_winmd(path)?;
    let graph = GraphBuilder::new(&winmd)
        .build()
        .with_context(|| format!("failed to build the type graph of: {}", path.display()))?;

    let groups: Vec<GroupEntry> = graph
        .groups()
        .map(|group| GroupEntry {
            api: group.name().to_string(),
            namespace: group.namespace().to_string(),
            types: group.types().len(),
            constants: group.constants().len(),
            functions: group.functions().len(),
        })
        .collect();

    let count = groups.len();
    let output = ListOutput { groups, count };

    print_output(&output, opts, |out| {
        let mut tw = TabWriter::new(vec![
            ("Api", Align::Left),
            ("Types", Align::Right),
            ("Constants", Align::Right),
            ("Functions", Align::Right),
        ]);
        for g in &out.groups {
            tw.row(vec![
                g.api.clone(),
                g.types.to_string(),
                g.constants.to_string(),
                g.functions.to_string(),
            ]);
        }
        tw.print();
        println!("\n{} API group(s) listed.", out.count);
    })
}
