//! Static flow diagrams for orchestrations
//!
//! Mermaid diagrams of the expected flow of each orchestration, printed by
//! `restage flow` so operators can see where a failed run stopped.

use crate::names::orchestrations;

/// Node IDs map to activity names for matching against run logs
#[derive(Debug)]
pub struct FlowDiagram {
    /// The orchestration name this flow belongs to
    pub orchestration_name: &'static str,
    /// Mermaid flowchart definition
    pub mermaid: &'static str,
    /// Mapping of node IDs to activity name suffixes
    pub node_mappings: &'static [(&'static str, &'static str)],
}

/// Refresh Staging orchestration flow
pub const REFRESH_STAGING_FLOW: FlowDiagram = FlowDiagram {
    orchestration_name: orchestrations::REFRESH_STAGING,
    mermaid: r#"flowchart TD
    subgraph prepare["Prepare"]
        start(["▶ Start"])
        find_snapshot["📋 Find Latest Snapshot<br/><small>automated, newest first</small>"]
        no_snapshot(["💥 No Snapshot"])
    end

    subgraph restore["Restore"]
        restore_snapshot["📋 Restore Snapshot<br/><small>restore-&lt;token&gt;, single-AZ</small>"]
        wait_restore{"⏳ Available?"}
        timeout(["💥 Timeout"])
    end

    subgraph mangle["Transform"]
        mangle_data["📋 Mangle Data"]
        mangle_failed(["💥 Mangling Failed<br/><small>swap skipped</small>"])
    end

    subgraph swap["Swap"]
        swap_identities["📦 Swap Identities"]
        success(["🏁 Success"])
    end

    start --> find_snapshot
    find_snapshot -->|None| no_snapshot
    find_snapshot -->|Found| restore_snapshot
    restore_snapshot --> wait_restore
    wait_restore -->|No| timeout
    wait_restore -->|Yes| mangle_data
    mangle_data -->|Fail| mangle_failed
    mangle_data -->|Ok| swap_identities
    swap_identities --> success

    classDef activity fill:#3b82f6,color:#fff,stroke:#1d4ed8
    classDef decision fill:#f59e0b,color:#000,stroke:#d97706
    classDef success fill:#22c55e,color:#fff,stroke:#16a34a
    classDef failure fill:#ef4444,color:#fff,stroke:#dc2626
    classDef suborg fill:#8b5cf6,color:#fff,stroke:#7c3aed
    classDef start fill:#a855f7,color:#fff,stroke:#9333ea

    class start start
    class find_snapshot,restore_snapshot,mangle_data activity
    class wait_restore decision
    class success success
    class no_snapshot,timeout,mangle_failed failure
    class swap_identities suborg"#,
    node_mappings: &[
        ("find_snapshot", "find-latest-snapshot"),
        ("restore_snapshot", "restore-from-snapshot"),
        ("wait_restore", "wait-for-available"),
        ("mangle_data", "mangle-data"),
        ("swap_identities", "swap-identities"),
    ],
};

/// Swap Identities orchestration flow
pub const SWAP_IDENTITIES_FLOW: FlowDiagram = FlowDiagram {
    orchestration_name: orchestrations::SWAP_IDENTITIES,
    mermaid: r#"flowchart TD
    subgraph retire["Retire Staging"]
        start(["▶ Start"])
        wait_restore{"⏳ Restore Available?"}
        rename_staging["📋 Rename staging → terminate-&lt;token&gt;"]
        wait_terminate{"⏳ Terminate Available?"}
    end

    subgraph promote["Promote Restore"]
        rename_restore["📋 Rename restore-&lt;token&gt; → staging"]
        wait_staging{"⏳ Staging Available?"}
    end

    subgraph cleanup["Cleanup"]
        delete_terminate["📋 Delete terminate-&lt;token&gt;<br/><small>no final snapshot</small>"]
        success(["🏁 Success"])
    end

    subgraph exposure["Failure Exposure (no rollback)"]
        untouched(["💥 Staging untouched"])
        vacant(["💥 Staging vacant<br/><small>manual repair</small>"])
        unconfirmed(["💥 Staging unconfirmed"])
        leftover(["💥 Old staging left over"])
    end

    start --> wait_restore
    wait_restore -->|No| untouched
    wait_restore -->|Yes| rename_staging
    rename_staging -->|Fail| untouched
    rename_staging --> wait_terminate
    wait_terminate -->|No| vacant
    wait_terminate -->|Yes| rename_restore
    rename_restore -->|Fail| vacant
    rename_restore --> wait_staging
    wait_staging -->|No| unconfirmed
    wait_staging -->|Yes| delete_terminate
    delete_terminate -->|Fail| leftover
    delete_terminate --> success

    classDef activity fill:#3b82f6,color:#fff,stroke:#1d4ed8
    classDef decision fill:#f59e0b,color:#000,stroke:#d97706
    classDef success fill:#22c55e,color:#fff,stroke:#16a34a
    classDef failure fill:#ef4444,color:#fff,stroke:#dc2626
    classDef start fill:#a855f7,color:#fff,stroke:#9333ea

    class start start
    class rename_staging,rename_restore,delete_terminate activity
    class wait_restore,wait_terminate,wait_staging decision
    class success success
    class untouched,vacant,unconfirmed,leftover failure"#,
    node_mappings: &[
        ("wait_restore", "wait-for-available"),
        ("rename_staging", "rename-instance"),
        ("wait_terminate", "wait-for-available"),
        ("rename_restore", "rename-instance"),
        ("wait_staging", "wait-for-available"),
        ("delete_terminate", "delete-instance"),
    ],
};

/// Get all flow diagrams
pub fn get_all_flows() -> Vec<&'static FlowDiagram> {
    vec![&REFRESH_STAGING_FLOW, &SWAP_IDENTITIES_FLOW]
}

/// Get flow diagram by orchestration name
pub fn get_flow_by_name(name: &str) -> Option<&'static FlowDiagram> {
    // Match by full name or short name
    let short_name = name.split("::").last().unwrap_or(name);

    get_all_flows()
        .into_iter()
        .find(|flow| flow.orchestration_name.split("::").last() == Some(short_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity_names::activities;

    const ACTIVITY_NAMES: &[&str] = &[
        activities::FIND_LATEST_SNAPSHOT,
        activities::RESTORE_FROM_SNAPSHOT,
        activities::WAIT_FOR_AVAILABLE,
        activities::MANGLE_DATA,
        activities::RENAME_INSTANCE,
        activities::DELETE_INSTANCE,
        orchestrations::SWAP_IDENTITIES,
    ];

    #[test]
    fn test_lookup_by_short_and_full_name() {
        assert_eq!(
            get_flow_by_name("swap-identities").unwrap().orchestration_name,
            orchestrations::SWAP_IDENTITIES
        );
        assert_eq!(
            get_flow_by_name(orchestrations::REFRESH_STAGING).unwrap().orchestration_name,
            orchestrations::REFRESH_STAGING
        );
        assert!(get_flow_by_name("create-instance").is_none());
    }

    #[test]
    fn test_node_mappings_point_at_known_steps() {
        for flow in get_all_flows() {
            for (node, suffix) in flow.node_mappings {
                assert!(flow.mermaid.contains(node), "{node} missing from diagram");
                assert!(
                    ACTIVITY_NAMES.iter().any(|name| name.ends_with(suffix)),
                    "{suffix} is not a known activity"
                );
            }
        }
    }
}
