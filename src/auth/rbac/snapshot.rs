//! Immutable, fully built view of the rule set

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::types::{RuleKind, WILDCARD};

/// In-memory materialization of every rule at one point in time
///
/// Built wholesale from a rule list and never mutated afterwards; the
/// enforcer replaces it as a unit on reload.
#[derive(Debug, Clone)]
pub struct EnforcementSnapshot {
    /// subject -> roles granted directly
    roles: HashMap<String, BTreeSet<String>>,
    /// role -> subjects holding it directly
    holders: HashMap<String, BTreeSet<String>>,
    /// subject -> (object, action) grants
    permissions: HashMap<String, Vec<(String, String)>>,
    role_names: BTreeSet<String>,
    rule_count: usize,
    max_depth: usize,
    loaded_at: DateTime<Utc>,
}

impl EnforcementSnapshot {
    /// Build a snapshot; `max_depth` bounds role-to-role hops during lookups
    pub fn build(rules: &[RuleKind], max_depth: usize) -> Self {
        let mut roles: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut holders: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut permissions: HashMap<String, Vec<(String, String)>> = HashMap::new();
        let mut role_names = BTreeSet::new();

        for rule in rules {
            match rule {
                RuleKind::Grouping { subject, role } => {
                    roles
                        .entry(subject.clone())
                        .or_default()
                        .insert(role.clone());
                    holders
                        .entry(role.clone())
                        .or_default()
                        .insert(subject.clone());
                    role_names.insert(role.clone());
                }
                RuleKind::Permission {
                    subject,
                    object,
                    action,
                } => {
                    role_names.insert(subject.clone());
                    let grants = permissions.entry(subject.clone()).or_default();
                    let grant = (object.clone(), action.clone());
                    if !grants.contains(&grant) {
                        grants.push(grant);
                    }
                }
            }
        }

        Self {
            roles,
            holders,
            permissions,
            role_names,
            rule_count: rules.len(),
            max_depth,
            loaded_at: Utc::now(),
        }
    }

    /// Snapshot with no rules
    pub fn empty(max_depth: usize) -> Self {
        Self::build(&[], max_depth)
    }

    /// Every role reachable from `subject`, nearest first
    ///
    /// Breadth-first with a visited set: cycles terminate, and at most
    /// `max_depth` grouping hops are followed.
    pub fn implicit_roles(&self, subject: &str) -> Vec<String> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut ordered = Vec::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        queue.push_back((subject, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= self.max_depth {
                continue;
            }
            let Some(direct) = self.roles.get(current) else {
                continue;
            };
            for role in direct {
                if visited.insert(role.as_str()) {
                    ordered.push(role.clone());
                    queue.push_back((role.as_str(), depth + 1));
                }
            }
        }

        ordered
    }

    /// Whether `subject` holds `role` directly or through inheritance
    pub fn has_role(&self, subject: &str, role: &str) -> bool {
        if self
            .roles
            .get(subject)
            .is_some_and(|direct| direct.contains(role))
        {
            return true;
        }
        self.implicit_roles(subject).iter().any(|r| r == role)
    }

    /// Whether `subject`, or any role it holds, may perform `action` on `object`
    pub fn enforce(&self, subject: &str, object: &str, action: &str) -> bool {
        if self.grants(subject, object, action) {
            return true;
        }
        self.implicit_roles(subject)
            .iter()
            .any(|role| self.grants(role, object, action))
    }

    fn grants(&self, subject: &str, object: &str, action: &str) -> bool {
        self.permissions.get(subject).is_some_and(|grants| {
            grants.iter().any(|(o, a)| {
                (o == WILDCARD || o == object) && (a == WILDCARD || a == action)
            })
        })
    }

    /// Roles granted directly to `subject`
    pub fn roles_for(&self, subject: &str) -> Vec<String> {
        self.roles
            .get(subject)
            .map(|roles| roles.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Subjects holding `role` directly
    pub fn holders_of(&self, role: &str) -> Vec<String> {
        self.holders
            .get(role)
            .map(|subjects| subjects.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Permission rules applying to `subject`, its own first, then by role
    pub fn implicit_permissions(&self, subject: &str) -> Vec<RuleKind> {
        std::iter::once(subject.to_string())
            .chain(self.implicit_roles(subject))
            .flat_map(|holder| {
                self.permissions
                    .get(&holder)
                    .into_iter()
                    .flatten()
                    .map(move |(object, action)| {
                        RuleKind::permission(holder.clone(), object.clone(), action.clone())
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Grouping targets plus every subject that is granted permissions
    pub fn all_roles(&self) -> &BTreeSet<String> {
        &self.role_names
    }

    /// Number of rules the snapshot was built from
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
