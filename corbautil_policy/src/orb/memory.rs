//! In-memory ORB
//!
//! A small, fully functional implementation of the collaborator traits. It
//! keeps the POA tree in memory, validates policy lists the way a POA would
//! (conflicting values of one policy type, destroyed policies), and counts
//! policy creation and destruction so callers can check ownership rules.

use super::{
    Orb, OrbError, Poa, PoaManager, PoaManagerFactory, Policy, PolicyHandle, PolicyType,
    PolicyValue, StandardPolicy,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

#[derive(Debug, Default)]
struct OrbState {
    next_id: AtomicU64,
    created_policies: AtomicUsize,
    destroyed_policies: AtomicUsize,
}

impl OrbState {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Policy object created by the in-memory ORB
#[derive(Debug)]
pub struct MemoryPolicy {
    policy_type: PolicyType,
    value: PolicyValue,
    destroyed: AtomicBool,
    state: Arc<OrbState>,
}

impl Policy for MemoryPolicy {
    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    fn policy_type(&self) -> PolicyType {
        self.policy_type
    }

    fn value(&self) -> PolicyValue {
        self.value.clone()
    }

    fn destroy(&self) {
        if !self.destroyed.swap(true, Ordering::AcqRel) {
            self.state.destroyed_policies.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// POA manager created by the in-memory ORB
#[derive(Debug)]
pub struct MemoryPoaManager {
    id: u64,
    label: Option<String>,
}

impl MemoryPoaManager {
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl PoaManager for MemoryPoaManager {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Labelled POA manager factory, as offered by some vendors
#[derive(Debug)]
pub struct MemoryPoaManagerFactory {
    state: Arc<OrbState>,
    labels: Mutex<Vec<String>>,
}

impl MemoryPoaManagerFactory {
    /// Labels of every manager created so far, in creation order
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().clone()
    }
}

impl PoaManagerFactory for MemoryPoaManagerFactory {
    fn create_poa_manager(&self, label: &str) -> Result<Arc<dyn PoaManager>, OrbError> {
        let mut labels = self.labels.lock();
        if labels.iter().any(|l| l == label) {
            return Err(OrbError::System {
                message: format!("ManagerAlreadyExists: '{}'", label),
            });
        }
        labels.push(label.to_string());

        Ok(Arc::new(MemoryPoaManager {
            id: self.state.next_id(),
            label: Some(label.to_string()),
        }))
    }
}

/// POA node in the in-memory tree
pub struct MemoryPoa {
    id: u64,
    name: String,
    parent: Option<Weak<MemoryPoa>>,
    self_ref: Weak<MemoryPoa>,
    manager: Arc<dyn PoaManager>,
    policies: Vec<(PolicyType, PolicyValue)>,
    children: Mutex<BTreeMap<String, Arc<MemoryPoa>>>,
    state: Arc<OrbState>,
}

impl MemoryPoa {
    fn new_node(
        name: &str,
        parent: Option<Weak<MemoryPoa>>,
        manager: Arc<dyn PoaManager>,
        policies: Vec<(PolicyType, PolicyValue)>,
        state: Arc<OrbState>,
    ) -> Arc<Self> {
        let id = state.next_id();
        Arc::new_cyclic(|self_ref| MemoryPoa {
            id,
            name: name.to_string(),
            parent,
            self_ref: self_ref.clone(),
            manager,
            policies,
            children: Mutex::new(BTreeMap::new()),
            state,
        })
    }

    /// Policy (type, value) pairs this POA was created with
    pub fn policies(&self) -> &[(PolicyType, PolicyValue)] {
        &self.policies
    }

    pub fn child(&self, name: &str) -> Option<Arc<MemoryPoa>> {
        self.children.lock().get(name).cloned()
    }

    pub fn child_names(&self) -> Vec<String> {
        self.children.lock().keys().cloned().collect()
    }

    pub fn manager_id(&self) -> u64 {
        self.manager.id()
    }

    fn validate(policies: &[PolicyHandle]) -> Result<Vec<(PolicyType, PolicyValue)>, OrbError> {
        let mut accepted: Vec<(PolicyType, PolicyValue)> = Vec::with_capacity(policies.len());

        for (index, policy) in policies.iter().enumerate() {
            let policy_type = policy.policy_type();
            let value = policy.value();

            if policy.is_destroyed() {
                return Err(OrbError::InvalidPolicy { index });
            }

            match accepted.iter().find(|(t, _)| *t == policy_type) {
                Some((_, existing)) if *existing != value => {
                    return Err(OrbError::InvalidPolicy { index });
                }
                Some(_) => {}
                None => accepted.push((policy_type, value)),
            }
        }

        Ok(accepted)
    }
}

impl Poa for MemoryPoa {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn parent(&self) -> Option<Arc<dyn Poa>> {
        self.parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|p| p as Arc<dyn Poa>)
    }

    fn the_poa_manager(&self) -> Arc<dyn PoaManager> {
        self.manager.clone()
    }

    fn create_policy(&self, policy: StandardPolicy) -> Result<PolicyHandle, OrbError> {
        Ok(new_policy(
            &self.state,
            policy.policy_type(),
            PolicyValue::Enumerant(policy.enumerant()),
        ))
    }

    fn create_child(
        &self,
        name: &str,
        manager: Option<Arc<dyn PoaManager>>,
        policies: &[PolicyHandle],
    ) -> Result<Arc<dyn Poa>, OrbError> {
        let accepted = Self::validate(policies)?;

        let mut children = self.children.lock();
        if children.contains_key(name) {
            return Err(OrbError::AdapterAlreadyExists {
                name: name.to_string(),
            });
        }

        let manager: Arc<dyn PoaManager> = match manager {
            Some(manager) => manager,
            None => Arc::new(MemoryPoaManager {
                id: self.state.next_id(),
                label: None,
            }),
        };

        let child = MemoryPoa::new_node(
            name,
            Some(self.self_ref.clone()),
            manager,
            accepted,
            self.state.clone(),
        );
        children.insert(name.to_string(), child.clone());

        Ok(child)
    }
}

fn new_policy(state: &Arc<OrbState>, policy_type: PolicyType, value: PolicyValue) -> PolicyHandle {
    state.created_policies.fetch_add(1, Ordering::Relaxed);
    Arc::new(MemoryPolicy {
        policy_type,
        value,
        destroyed: AtomicBool::new(false),
        state: state.clone(),
    })
}

/// The in-memory ORB
pub struct InMemoryOrb {
    state: Arc<OrbState>,
    root: Arc<MemoryPoa>,
    root_available: bool,
    vendor_policies: bool,
    manager_factory: Option<Arc<MemoryPoaManagerFactory>>,
}

impl InMemoryOrb {
    pub fn new() -> Self {
        let state = Arc::new(OrbState::default());
        let root_manager: Arc<dyn PoaManager> = Arc::new(MemoryPoaManager {
            id: state.next_id(),
            label: None,
        });
        let root = MemoryPoa::new_node("RootPOA", None, root_manager, Vec::new(), state.clone());

        Self {
            state,
            root,
            root_available: true,
            vendor_policies: true,
            manager_factory: None,
        }
    }

    /// Offer a labelled POA manager factory
    pub fn with_poa_manager_factory(mut self) -> Self {
        self.manager_factory = Some(Arc::new(MemoryPoaManagerFactory {
            state: self.state.clone(),
            labels: Mutex::new(Vec::new()),
        }));
        self
    }

    /// Make `resolve_root_poa` fail, as an ORB without a POA would
    pub fn without_root_poa(mut self) -> Self {
        self.root_available = false;
        self
    }

    /// Reject every `ORB::create_policy` request
    pub fn without_vendor_policies(mut self) -> Self {
        self.vendor_policies = false;
        self
    }

    pub fn root(&self) -> Arc<MemoryPoa> {
        self.root.clone()
    }

    pub fn manager_factory(&self) -> Option<Arc<MemoryPoaManagerFactory>> {
        self.manager_factory.clone()
    }

    /// Look up a POA by its `/`-separated path below the root
    pub fn find(&self, path: &str) -> Option<Arc<MemoryPoa>> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.root.clone(), |poa, segment| poa.child(segment))
    }

    pub fn created_policy_count(&self) -> usize {
        self.state.created_policies.load(Ordering::Relaxed)
    }

    pub fn destroyed_policy_count(&self) -> usize {
        self.state.destroyed_policies.load(Ordering::Relaxed)
    }

    /// Policies created but not yet destroyed
    pub fn live_policy_count(&self) -> usize {
        self.created_policy_count() - self.destroyed_policy_count()
    }
}

impl Default for InMemoryOrb {
    fn default() -> Self {
        Self::new()
    }
}

impl Orb for InMemoryOrb {
    fn resolve_root_poa(&self) -> Result<Arc<dyn Poa>, OrbError> {
        if !self.root_available {
            return Err(OrbError::InitialReferenceNotFound {
                id: "RootPOA".to_string(),
            });
        }
        Ok(self.root.clone())
    }

    fn create_policy(
        &self,
        policy_type: PolicyType,
        value: PolicyValue,
    ) -> Result<PolicyHandle, OrbError> {
        if !self.vendor_policies {
            return Err(OrbError::UnsupportedPolicy { policy_type });
        }
        Ok(new_policy(&self.state, policy_type, value))
    }

    fn poa_manager_factory(&self) -> Option<Arc<dyn PoaManagerFactory>> {
        self.manager_factory
            .clone()
            .map(|f| f as Arc<dyn PoaManagerFactory>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orb::policy_type;
    use assert_matches::assert_matches;

    #[test]
    fn test_root_poa_resolution() {
        let orb = InMemoryOrb::new();
        let root = orb.resolve_root_poa().unwrap();
        assert_eq!(root.name(), "RootPOA");
        assert!(root.parent().is_none());

        let orb = InMemoryOrb::new().without_root_poa();
        assert_matches!(
            orb.resolve_root_poa().err(),
            Some(OrbError::InitialReferenceNotFound { .. })
        );
    }

    #[test]
    fn test_create_child_and_find() {
        let orb = InMemoryOrb::new();
        let root = orb.resolve_root_poa().unwrap();
        let persistent = root.create_policy(StandardPolicy::Persistent).unwrap();

        let acme = root.create_child("Acme", None, &[persistent]).unwrap();
        let foo = acme.create_child("Foo", None, &[]).unwrap();

        assert!(foo.parent().unwrap().is_same(acme.as_ref()));
        assert!(!foo.is_same(root.as_ref()));

        let found = orb.find("Acme/Foo").unwrap();
        assert_eq!(found.id(), foo.id());
        assert_eq!(
            orb.find("Acme").unwrap().policies(),
            &[(policy_type::LIFESPAN, PolicyValue::Enumerant(1))]
        );
        assert!(orb.find("Acme/Bar").is_none());
    }

    #[test]
    fn test_duplicate_child_name() {
        let orb = InMemoryOrb::new();
        let root = orb.resolve_root_poa().unwrap();
        root.create_child("Acme", None, &[]).unwrap();

        assert_matches!(
            root.create_child("Acme", None, &[]).err(),
            Some(OrbError::AdapterAlreadyExists { ref name }) if name == "Acme"
        );
    }

    #[test]
    fn test_conflicting_policies_report_index() {
        let orb = InMemoryOrb::new();
        let root = orb.resolve_root_poa().unwrap();
        let policies = vec![
            root.create_policy(StandardPolicy::UserId).unwrap(),
            root.create_policy(StandardPolicy::Persistent).unwrap(),
            root.create_policy(StandardPolicy::Transient).unwrap(),
        ];

        assert_matches!(
            root.create_child("Acme", None, &policies).err(),
            Some(OrbError::InvalidPolicy { index: 2 })
        );
    }

    #[test]
    fn test_destroyed_policy_is_rejected() {
        let orb = InMemoryOrb::new();
        let root = orb.resolve_root_poa().unwrap();
        let policy = root.create_policy(StandardPolicy::Retain).unwrap();
        policy.destroy();
        policy.destroy();

        assert_eq!(orb.destroyed_policy_count(), 1);
        assert_matches!(
            root.create_child("Acme", None, &[policy]).err(),
            Some(OrbError::InvalidPolicy { index: 0 })
        );
    }

    #[test]
    fn test_policy_accounting() {
        let orb = InMemoryOrb::new();
        let a = orb
            .create_policy(policy_type::ORBIX_LEASING, PolicyValue::Bool(false))
            .unwrap();
        let _b = orb
            .create_policy(
                policy_type::ORBIX_OBJECT_DEACTIVATION,
                PolicyValue::Enumerant(0),
            )
            .unwrap();
        a.destroy();

        assert_eq!(orb.created_policy_count(), 2);
        assert_eq!(orb.live_policy_count(), 1);
    }

    #[test]
    fn test_vendor_policies_can_be_disabled() {
        let orb = InMemoryOrb::new().without_vendor_policies();
        assert_matches!(
            orb.create_policy(policy_type::ORBIX_LEASING, PolicyValue::Bool(false)),
            Err(OrbError::UnsupportedPolicy { .. })
        );
    }

    #[test]
    fn test_manager_assignment() {
        let orb = InMemoryOrb::new();
        let root = orb.resolve_root_poa().unwrap();

        let shared = root.create_child("A", Some(root.the_poa_manager()), &[]).unwrap();
        assert_eq!(shared.the_poa_manager().id(), root.the_poa_manager().id());

        let fresh = root.create_child("B", None, &[]).unwrap();
        assert_ne!(fresh.the_poa_manager().id(), root.the_poa_manager().id());
    }

    #[test]
    fn test_manager_factory_labels() {
        let orb = InMemoryOrb::new().with_poa_manager_factory();
        let factory = orb.poa_manager_factory().unwrap();
        factory.create_poa_manager("core").unwrap();
        assert!(factory.create_poa_manager("core").is_err());
        assert_eq!(orb.manager_factory().unwrap().labels(), vec!["core"]);

        assert!(InMemoryOrb::new().poa_manager_factory().is_none());
    }
}
