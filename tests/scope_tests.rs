use weir_keys::keys::{KeyProducer, QueueDescriptor};
use weir_keys::scope::{AuthenticatedEnvironment, EnvDescriptor, EnvScope, Organization, Project};

fn env() -> AuthenticatedEnvironment {
    AuthenticatedEnvironment {
        id: "e1".to_string(),
        organization: Organization {
            id: "o1".to_string(),
        },
        project: Project {
            id: "p1".to_string(),
        },
    }
}

fn descriptor() -> EnvDescriptor {
    EnvDescriptor {
        org_id: "o1".to_string(),
        project_id: "p1".to_string(),
        env_id: "e1".to_string(),
    }
}

#[test]
fn test_env_scope_accessors_dispatch_on_variant() {
    let env = env();
    let descriptor = descriptor();

    let from_env = EnvScope::from(&env);
    let from_descriptor = EnvScope::from(&descriptor);

    assert_eq!(from_env.org_id(), "o1");
    assert_eq!(from_env.project_id(), "p1");
    assert_eq!(from_env.env_id(), "e1");

    assert_eq!(from_descriptor.org_id(), from_env.org_id());
    assert_eq!(from_descriptor.project_id(), from_env.project_id());
    assert_eq!(from_descriptor.env_id(), from_env.env_id());
}

#[test]
fn test_env_descriptor_from_authenticated_environment() {
    let flattened = EnvDescriptor::from(&env());
    assert_eq!(flattened, descriptor());
}

#[test]
fn test_env_descriptor_wire_shape() {
    let json = serde_json::to_value(descriptor()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "org_id": "o1",
            "project_id": "p1",
            "env_id": "e1",
        })
    );

    let parsed: EnvDescriptor = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, descriptor());
}

#[test]
fn test_authenticated_environment_wire_shape() {
    let json = serde_json::to_value(env()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "e1",
            "organization": { "id": "o1" },
            "project": { "id": "p1" },
        })
    );
}

#[test]
fn test_queue_descriptor_reslices_into_env_descriptor() {
    let keys = KeyProducer::new("runqueue:");
    let queue = keys.queue_key(&env(), "default", Some("cust42"));
    let parsed = keys.descriptor_from_queue(&queue);

    assert_eq!(parsed.env_descriptor(), descriptor());

    // The re-sliced scope feeds straight back into the scope builders.
    assert_eq!(
        keys.env_queue_key(&parsed.env_descriptor()),
        keys.env_queue_key(&env())
    );
}

#[test]
fn test_queue_descriptor_serde_roundtrip() {
    let descriptor = QueueDescriptor {
        org_id: "o1".to_string(),
        project_id: "p1".to_string(),
        env_id: "e1".to_string(),
        queue: "default".to_string(),
        concurrency_key: Some("cust42".to_string()),
    };

    let json = serde_json::to_string(&descriptor).unwrap();
    let parsed: QueueDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, descriptor);
}
