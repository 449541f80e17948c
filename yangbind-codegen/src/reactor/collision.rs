//! Collision domains.
//!
//! Every composite generator owns a domain holding the members its children
//! contribute. Members compete for class names (and package segments) within
//! the domain; conflicts are settled by advancing the members' naming
//! strategies until every name is unique.

use std::collections::{BTreeMap, HashSet};

use crate::error::ReactorError;
use crate::reactor::naming::ClassNamingStrategy;

/// Handle of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct MemberId(usize);

/// Handle of a collision domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct DomainId(usize);

/// Package of a secondary member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SecondaryPackage {
    /// The member has no children and needs no package.
    None,
    /// The primary's package followed by a fixed segment.
    Suffix(String),
    /// Segments mirroring an augment target path.
    Augment(Vec<String>),
}

#[derive(Debug, Clone)]
enum MemberKind {
    Primary {
        strategy: ClassNamingStrategy,
        packaged: bool,
    },
    Secondary {
        primary: MemberId,
        class_suffix: String,
        package: SecondaryPackage,
    },
}

#[derive(Debug, Clone)]
struct Member {
    kind: MemberKind,
    owner: String,
}

#[derive(Debug, Clone)]
struct Domain {
    owner: String,
    members: Vec<MemberId>,
    solved: bool,
}

/// Arena of collision domains and their members.
#[derive(Debug, Clone, Default)]
pub(crate) struct CollisionDomains {
    domains: Vec<Domain>,
    members: Vec<Member>,
}

impl CollisionDomains {
    /// Creates an empty domain owned by the described node.
    pub(crate) fn new_domain(&mut self, owner: impl Into<String>) -> DomainId {
        self.domains.push(Domain {
            owner: owner.into(),
            members: Vec::new(),
            solved: false,
        });
        DomainId(self.domains.len() - 1)
    }

    /// Adds a primary member competing in `domain`.
    ///
    /// `packaged` members also compete for their package segment.
    pub(crate) fn add_primary(
        &mut self,
        domain: DomainId,
        strategy: ClassNamingStrategy,
        packaged: bool,
        owner: impl Into<String>,
    ) -> MemberId {
        let id = self.push(
            MemberKind::Primary { strategy, packaged },
            owner.into(),
        );
        self.domains[domain.0].members.push(id);
        id
    }

    /// Adds a primary which anchors secondaries but competes nowhere.
    pub(crate) fn add_prefix(
        &mut self,
        strategy: ClassNamingStrategy,
        owner: impl Into<String>,
    ) -> MemberId {
        self.push(
            MemberKind::Primary {
                strategy,
                packaged: false,
            },
            owner.into(),
        )
    }

    /// Adds a secondary member named after `primary`.
    pub(crate) fn add_secondary(
        &mut self,
        domain: DomainId,
        primary: MemberId,
        class_suffix: impl Into<String>,
        package: SecondaryPackage,
        owner: impl Into<String>,
    ) -> MemberId {
        let id = self.push(
            MemberKind::Secondary {
                primary,
                class_suffix: class_suffix.into(),
                package,
            },
            owner.into(),
        );
        self.domains[domain.0].members.push(id);
        id
    }

    fn push(&mut self, kind: MemberKind, owner: String) -> MemberId {
        self.members.push(Member { kind, owner });
        MemberId(self.members.len() - 1)
    }

    /// Returns the strategy of a primary, or of the primary behind a secondary.
    pub(crate) fn strategy(&self, member: MemberId) -> &ClassNamingStrategy {
        match &self.members[member.0].kind {
            MemberKind::Primary { strategy, .. } => strategy,
            MemberKind::Secondary { primary, .. } => self.strategy(*primary),
        }
    }

    /// Returns the current simple class name of a member.
    pub(crate) fn class_name(&self, member: MemberId) -> String {
        match &self.members[member.0].kind {
            MemberKind::Primary { strategy, .. } => strategy.simple_class_name(),
            MemberKind::Secondary {
                primary,
                class_suffix,
                ..
            } => format!("{}{}", self.class_name(*primary), class_suffix),
        }
    }

    /// Returns the current package segment of a member, relative to the
    /// package of the domain owner.
    pub(crate) fn package_segment(&self, member: MemberId) -> Option<String> {
        match &self.members[member.0].kind {
            MemberKind::Primary { strategy, .. } => Some(strategy.package_segment()),
            MemberKind::Secondary {
                primary, package, ..
            } => match package {
                SecondaryPackage::None => None,
                SecondaryPackage::Suffix(suffix) => {
                    self.package_segment(*primary).map(|p| format!("{p}.{suffix}"))
                }
                SecondaryPackage::Augment(segments) => Some(segments.join(".")),
            },
        }
    }

    /// Returns the package segment this member competes for, if any.
    fn competing_package(&self, member: MemberId) -> Option<String> {
        match &self.members[member.0].kind {
            MemberKind::Primary { packaged: true, .. }
            | MemberKind::Secondary {
                package: SecondaryPackage::Suffix(_) | SecondaryPackage::Augment(_),
                ..
            } => self.package_segment(member),
            _ => None,
        }
    }

    /// Augment packages mirror their target path and never move.
    fn is_augment(&self, member: MemberId) -> bool {
        matches!(
            self.members[member.0].kind,
            MemberKind::Secondary {
                package: SecondaryPackage::Augment(_),
                ..
            }
        )
    }

    /// Returns the primary whose strategy determines this member's name.
    fn anchor(&self, member: MemberId) -> MemberId {
        match &self.members[member.0].kind {
            MemberKind::Primary { .. } => member,
            MemberKind::Secondary { primary, .. } => self.anchor(*primary),
        }
    }

    fn is_primary(&self, member: MemberId) -> bool {
        matches!(self.members[member.0].kind, MemberKind::Primary { .. })
    }

    /// Advances the strategy behind a member.
    ///
    /// Returns `false` if the strategy is already exhausted.
    pub(crate) fn signal_conflict(&mut self, member: MemberId) -> bool {
        let anchor = self.anchor(member);
        let Member { kind, owner } = &mut self.members[anchor.0];
        let MemberKind::Primary { strategy, .. } = kind else {
            return false;
        };
        match strategy.fallback() {
            Some(next) => {
                tracing::trace!(
                    owner = %owner,
                    from = ?strategy.stage(),
                    to = ?next.stage(),
                    "Advancing naming strategy"
                );
                *strategy = next;
                true
            }
            None => false,
        }
    }

    /// Resolves all conflicts in a domain.
    ///
    /// Primaries are settled among themselves first; secondaries are then
    /// checked against every member. Each round advances every conflicting
    /// member once, so the loop terminates when strategies run out.
    ///
    /// Returns `true` if any strategy had to change.
    ///
    /// # Errors
    /// Returns [`ReactorError::CollisionExhausted`] if two members of one
    /// conflict group cannot advance any further.
    pub(crate) fn find_solution(&mut self, domain: DomainId) -> Result<bool, ReactorError> {
        if self.domains[domain.0].solved {
            return Ok(false);
        }

        let all = self.domains[domain.0].members.clone();
        let mut changed = false;
        if all.len() > 1 {
            let primaries: Vec<_> = all.iter().copied().filter(|m| self.is_primary(*m)).collect();
            loop {
                let mut groups = self.conflicts(&primaries);
                if groups.is_empty() {
                    groups = self.conflicts(&all);
                }
                if groups.is_empty() {
                    break;
                }
                changed = true;
                self.advance(domain, &groups)?;
            }
        }

        self.domains[domain.0].solved = true;
        Ok(changed)
    }

    /// Groups members sharing a class name or a package segment.
    ///
    /// A package shared with augments is yielded to them: only the other
    /// members of such a group move, and augments may share among themselves.
    fn conflicts(&self, members: &[MemberId]) -> Vec<Vec<MemberId>> {
        let mut by_class: BTreeMap<String, Vec<MemberId>> = BTreeMap::new();
        let mut by_package: BTreeMap<String, Vec<MemberId>> = BTreeMap::new();
        for member in members {
            by_class
                .entry(self.class_name(*member))
                .or_default()
                .push(*member);
            if let Some(package) = self.competing_package(*member) {
                by_package.entry(package).or_default().push(*member);
            }
        }

        let packages = by_package
            .into_values()
            .filter(|group| group.len() > 1)
            .filter_map(|group| {
                let movable: Vec<_> = group
                    .into_iter()
                    .filter(|m| !self.is_augment(*m))
                    .collect();
                (!movable.is_empty()).then_some(movable)
            });

        by_class
            .into_values()
            .filter(|group| group.len() > 1)
            .chain(packages)
            .collect()
    }

    fn advance(&mut self, domain: DomainId, groups: &[Vec<MemberId>]) -> Result<(), ReactorError> {
        let mut advanced = HashSet::new();
        for group in groups {
            let mut stuck = Vec::new();
            for member in group {
                let anchor = self.anchor(*member);
                if advanced.contains(&anchor) {
                    continue;
                }
                if self.signal_conflict(*member) {
                    advanced.insert(anchor);
                } else {
                    stuck.push(*member);
                }
            }

            if stuck.len() > 1 || (group.len() == 1 && !stuck.is_empty()) {
                return Err(ReactorError::CollisionExhausted {
                    domain: self.domains[domain.0].owner.clone(),
                    name: self.class_name(stuck[0]),
                    members: stuck
                        .iter()
                        .map(|m| self.members[m.0].owner.clone())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactor::naming::{NamingStage, StatementNamespace};

    fn camel(namespace: StatementNamespace, name: &str) -> ClassNamingStrategy {
        ClassNamingStrategy::camel_case(namespace, name)
    }

    #[test]
    fn test_single_member_keeps_camel_case() {
        let mut domains = CollisionDomains::default();
        let domain = domains.new_domain("module");
        let member = domains.add_primary(domain, camel(StatementNamespace::Container, "foo-bar"), true, "foo-bar");

        assert!(!domains.find_solution(domain).expect("Failed to solve domain"));
        assert_eq!(domains.class_name(member), "FooBar");
        assert_eq!(domains.strategy(member).stage(), NamingStage::CamelCase);
    }

    #[test]
    fn test_colliding_primaries_get_distinct_names() {
        let mut domains = CollisionDomains::default();
        let domain = domains.new_domain("module");
        let namespaces = [
            StatementNamespace::Container,
            StatementNamespace::Grouping,
            StatementNamespace::Typedef,
            StatementNamespace::Identity,
        ];
        let members: Vec<_> = namespaces
            .iter()
            .map(|ns| domains.add_primary(domain, camel(*ns, "foo"), true, format!("{ns:?}")))
            .collect();

        assert!(domains.find_solution(domain).expect("Failed to solve domain"));

        let names: HashSet<_> = members.iter().map(|m| domains.class_name(*m)).collect();
        assert_eq!(names.len(), members.len());
        assert!(names.contains("Foo$CO"));
        assert!(names.contains("Foo$GR"));
    }

    #[test]
    fn test_conflict_is_not_repeated_once_solved() {
        let mut domains = CollisionDomains::default();
        let domain = domains.new_domain("module");
        let a = domains.add_primary(domain, camel(StatementNamespace::Container, "foo"), true, "a");
        domains.add_primary(domain, camel(StatementNamespace::Grouping, "foo"), true, "b");

        assert!(domains.find_solution(domain).expect("Failed to solve domain"));
        assert!(!domains.find_solution(domain).expect("Failed to solve domain"));
        assert_eq!(domains.class_name(a), "Foo$CO");
    }

    #[test]
    fn test_separator_collisions_reach_bijective() {
        let mut domains = CollisionDomains::default();
        let domain = domains.new_domain("container");
        let dash = domains.add_primary(domain, camel(StatementNamespace::Container, "foo-bar"), true, "dash");
        let dot = domains.add_primary(domain, camel(StatementNamespace::Container, "foo.bar"), true, "dot");

        domains.find_solution(domain).expect("Failed to solve domain");
        assert_eq!(domains.class_name(dash), "foo$2dbar$CO");
        assert_eq!(domains.class_name(dot), "foo$2ebar$CO");
        assert_ne!(domains.package_segment(dash), domains.package_segment(dot));
    }

    #[test]
    fn test_secondary_follows_primary() {
        let mut domains = CollisionDomains::default();
        let domain = domains.new_domain("module");
        let list = domains.add_primary(domain, camel(StatementNamespace::List, "foo"), true, "list");
        let key = domains.add_secondary(domain, list, "Key", SecondaryPackage::None, "key");
        let other = domains.add_primary(domain, camel(StatementNamespace::Container, "foo-key"), true, "container");

        domains.find_solution(domain).expect("Failed to solve domain");

        let key_name = domains.class_name(key);
        let other_name = domains.class_name(other);
        assert_ne!(key_name, other_name);
        assert_eq!(key_name, format!("{}Key", domains.class_name(list)));
        assert_eq!(domains.package_segment(key), None);
    }

    #[test]
    fn test_suffix_secondary_package() {
        let mut domains = CollisionDomains::default();
        let domain = domains.new_domain("module");
        let rpc = domains.add_primary(domain, camel(StatementNamespace::Rpc, "reset-all"), true, "rpc");
        let input = domains.add_secondary(
            domain,
            rpc,
            "Input",
            SecondaryPackage::Suffix("input".to_string()),
            "input",
        );

        domains.find_solution(domain).expect("Failed to solve domain");
        assert_eq!(domains.class_name(input), "ResetAllInput");
        assert_eq!(domains.package_segment(input).as_deref(), Some("reset.all.input"));
    }

    #[test]
    fn test_augment_package_displaces_container() {
        let mut domains = CollisionDomains::default();
        let domain = domains.new_domain("module");
        let container = domains.add_primary(domain, camel(StatementNamespace::Container, "foo"), true, "container");
        let prefix = domains.add_prefix(camel(StatementNamespace::Container, "foo"), "augment");
        let first = domains.add_secondary(
            domain,
            prefix,
            "1",
            SecondaryPackage::Augment(vec!["foo".to_string()]),
            "augment",
        );
        let second_prefix = domains.add_prefix(camel(StatementNamespace::Container, "foo"), "other");
        let second = domains.add_secondary(
            domain,
            second_prefix,
            "2",
            SecondaryPackage::Augment(vec!["foo".to_string()]),
            "other",
        );

        assert!(domains.find_solution(domain).expect("Failed to solve domain"));
        assert_eq!(domains.class_name(container), "Foo$CO");
        assert_eq!(domains.package_segment(container).as_deref(), Some("foo$co"));
        assert_eq!(domains.class_name(first), "Foo1");
        assert_eq!(domains.class_name(second), "Foo2");
        assert_eq!(domains.package_segment(first).as_deref(), Some("foo"));
        assert_eq!(domains.package_segment(second).as_deref(), Some("foo"));
    }

    #[test]
    fn test_exhausted_members_are_fatal() {
        let mut domains = CollisionDomains::default();
        let domain = domains.new_domain("module");
        domains.add_primary(domain, camel(StatementNamespace::Leaf, "dup"), false, "first");
        domains.add_primary(domain, camel(StatementNamespace::Leaf, "dup"), false, "second");

        let err = domains.find_solution(domain).unwrap_err();
        assert!(matches!(err, ReactorError::CollisionExhausted { .. }));
    }
}
