use anyhow::Result;
use restage_orchestrations::flows::{get_all_flows, get_flow_by_name, FlowDiagram};

pub fn run_flow(name: Option<String>) -> Result<()> {
    let flows = select_flows(name.as_deref())?;

    for flow in flows {
        println!("%% {}", flow.orchestration_name);
        println!("{}", flow.mermaid);
        println!();
    }

    Ok(())
}

fn select_flows(name: Option<&str>) -> Result<Vec<&'static FlowDiagram>> {
    match name {
        None => Ok(get_all_flows()),
        Some(name) => match get_flow_by_name(name) {
            Some(flow) => Ok(vec![flow]),
            None => {
                let known: Vec<&str> = get_all_flows()
                    .iter()
                    .filter_map(|flow| flow.orchestration_name.split("::").last())
                    .collect();
                anyhow::bail!("Unknown orchestration '{}' (known: {})", name, known.join(", "))
            }
        },
    }
}
