//! Host roles of the measured cluster.
//!
//! The mapping is fixed for the deployment the dumps come from; `db1` hosts
//! are the DB nodes with ACM, whose client processes count as "specialized".

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Pilot,
    Db1,
    Db2,
    Io,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Pilot => "pilot",
            Role::Db1 => "db1",
            Role::Db2 => "db2",
            Role::Io => "io",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RoleMap {
    pilot: &'static [&'static str],
    db1: &'static [&'static str],
    db2: &'static [&'static str],
    io: &'static [&'static str],
}

static STANDARD: RoleMap = RoleMap {
    pilot: &["0-0-1", "0-0-9"],
    db1: &["0-0-2", "0-0-10"],
    db2: &["0-0-3", "0-0-11", "0-1-2", "0-1-10", "0-1-3", "0-1-11"],
    io: &["0-0-4", "0-0-12"],
};

impl RoleMap {
    pub fn standard() -> &'static RoleMap {
        &STANDARD
    }

    pub fn hosts(&self, role: Role) -> &'static [&'static str] {
        match role {
            Role::Pilot => self.pilot,
            Role::Db1 => self.db1,
            Role::Db2 => self.db2,
            Role::Io => self.io,
        }
    }

    pub fn contains(&self, role: Role, host_id: &str) -> bool {
        self.hosts(role).iter().any(|h| *h == host_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn db1_membership() {
        let roles = RoleMap::standard();
        assert!(roles.contains(Role::Db1, "0-0-2"));
        assert!(roles.contains(Role::Db1, "0-0-10"));
        assert!(!roles.contains(Role::Db1, "0-0-4"));
        assert!(!roles.contains(Role::Db1, "0-0-1"));
    }

    #[test]
    fn other_roles_list_their_hosts() {
        let roles = RoleMap::standard();
        assert!(roles.contains(Role::Db2, "0-1-11"));
        assert!(roles.contains(Role::Io, "0-0-12"));
        assert!(roles.contains(Role::Pilot, "0-0-9"));
        assert!(!roles.contains(Role::Pilot, "9-9-9"));
    }

    #[test]
    fn no_host_has_two_roles() {
        let roles = RoleMap::standard();
        let mut seen = std::collections::BTreeSet::new();
        for role in [Role::Pilot, Role::Db1, Role::Db2, Role::Io] {
            for host in roles.hosts(role) {
                assert!(seen.insert(*host), "{} listed twice", host);
            }
        }
        assert_eq!(seen.len(), 12);
    }
}
