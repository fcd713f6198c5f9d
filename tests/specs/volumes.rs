//! Volume replica specs: concurrently advertising MRCs accumulate.

use crate::prelude::*;
use drift_core::{Service, ServiceKind, ServiceUuid};

fn stored_volume(cluster: &Cluster) -> Service {
    cluster.dir.service(&ServiceUuid::new("svc-1")).unwrap()
}

#[tokio::test]
async fn second_mrc_joins_the_replica_list() {
    let cluster = cluster(vec![volume("svc-1", "uuid-B")]);
    let mut prior = volume("svc-1", "uuid-A");
    prior.version = 2;
    cluster.dir.seed_service(prior);

    cluster.agent.initialize().await.unwrap();

    let stored = stored_volume(&cluster);
    assert_eq!(stored.version, 3);
    assert_eq!(stored.data.get("mrc").map(String::as_str), Some("uuid-A"));
    assert_eq!(stored.data.get("mrc2").map(String::as_str), Some("uuid-B"));
    assert_eq!(stored.data.get("policy").map(String::as_str), Some("RW"));
    assert_eq!(stored.data.get("static.status").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn third_mrc_extends_past_the_highest_index() {
    let cluster = cluster(vec![volume("svc-1", "uuid-D")]);
    let mut prior = Service::new(ServiceUuid::new("svc-1"), ServiceKind::Volume, "vol0");
    prior.version = 4;
    prior.data.insert("mrc".to_string(), "uuid-A".to_string());
    prior.data.insert("mrc2".to_string(), "uuid-B".to_string());
    prior.data.insert("mrc5".to_string(), "uuid-C".to_string());
    cluster.dir.seed_service(prior);

    cluster.agent.initialize().await.unwrap();

    let stored = stored_volume(&cluster);
    assert_eq!(stored.data.get("mrc").map(String::as_str), Some("uuid-A"));
    assert_eq!(stored.data.get("mrc2").map(String::as_str), Some("uuid-B"));
    assert_eq!(stored.data.get("mrc5").map(String::as_str), Some("uuid-C"));
    assert_eq!(stored.data.get("mrc6").map(String::as_str), Some("uuid-D"));
}

#[tokio::test]
async fn reregistration_does_not_duplicate_the_writer() {
    let cluster = cluster(vec![volume("svc-1", "uuid-A")]);
    cluster.agent.initialize().await.unwrap();

    // A second round observes its own uuid under `mrc` and adds nothing.
    let first = stored_volume(&cluster);
    cluster.agent.initialize().await.unwrap();
    let second = stored_volume(&cluster);

    assert_eq!(second.version, first.version + 1);
    assert_eq!(second.data, first.data);
    let replicas = second.data.keys().filter(|k| k.starts_with("mrc")).count();
    assert_eq!(replicas, 1);
}
