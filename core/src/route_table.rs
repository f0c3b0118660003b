//! The static route table.
//!
//! Built once at startup and read-only afterwards. Every lookup succeeds:
//! paths that are malformed or not registered resolve to the wildcard
//! fallback, which redirects to the root route. Lookups ignore ASCII and
//! Unicode case, so `/Employees` finds `/employees`.

use std::collections::HashMap;
use std::slice;

use thiserror::Error;

use clinic_config::{ConsoleConfig, RouteEntry};
use clinic_types::{Access, RouteDescriptor, RoutePath, Session};

use crate::gateway;

/// Path shown for the wildcard fallback route.
pub const WILDCARD_PATH: &str = "/:pathMatch(.*)*";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("route {0} is registered more than once")]
    Duplicate(RoutePath),
    #[error("route {from} redirects to unregistered route {to}")]
    UnknownRedirect { from: RoutePath, to: RoutePath },
    #[error("route table has no root route `/` for unknown paths to fall back to")]
    MissingRoot,
}

#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<RouteDescriptor>,
}

impl RouteTableBuilder {
    #[must_use]
    pub fn route(mut self, descriptor: RouteDescriptor) -> Self {
        self.routes.push(descriptor);
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut index = HashMap::with_capacity(self.routes.len());
        for (position, route) in self.routes.iter().enumerate() {
            if index.insert(lookup_key(route.path()), position).is_some() {
                return Err(RouteTableError::Duplicate(route.path().clone()));
            }
        }
        if !index.contains_key(&lookup_key(&RoutePath::root())) {
            return Err(RouteTableError::MissingRoot);
        }
        for route in &self.routes {
            if let Some(target) = route.redirect()
                && !index.contains_key(&lookup_key(target))
            {
                return Err(RouteTableError::UnknownRedirect {
                    from: route.path().clone(),
                    to: target.clone(),
                });
            }
        }

        let fallback = RouteDescriptor::new(wildcard_path())
            .with_name("NotFound")
            .redirecting_to(RoutePath::root());

        tracing::debug!(routes = self.routes.len(), "Route table built");
        Ok(RouteTable {
            routes: self.routes,
            index,
            fallback,
        })
    }
}

/// Ordered, immutable collection of route descriptors.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    index: HashMap<String, usize>,
    fallback: RouteDescriptor,
}

impl RouteTable {
    #[must_use]
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// The console's own navigation map.
    #[must_use]
    pub fn console_default() -> Self {
        let route = |raw: &str| RouteDescriptor::new(fixed_path(raw));
        let page = |raw: &str, name: &str, title: &str, icon: &str| {
            route(raw).with_name(name).with_title(title).with_icon(icon)
        };

        let built = Self::builder()
            .route(
                route("/login")
                    .with_name("Login")
                    .with_access(Access::Public),
            )
            .route(
                route("/")
                    .with_name("Layout")
                    .redirecting_to(fixed_path("/dashboard")),
            )
            .route(page("/dashboard", "Dashboard", "首页", "HomeFilled"))
            .route(page("/customers", "Customers", "顾客管理", "UserFilled"))
            .route(
                page("/employees", "Employees", "员工管理", "Avatar")
                    .with_access(Access::Administrator),
            )
            .route(
                page("/projects", "Projects", "项目管理", "FirstAidKit")
                    .with_access(Access::Administrator),
            )
            .route(page("/visits", "Visits", "就诊管理", "DocumentChecked"))
            .route(page(
                "/revisit-records",
                "RevisitRecords",
                "回访记录",
                "PhoneFilled",
            ))
            .route(page("/reports", "Reports", "业绩报表", "TrendCharts"))
            .build();

        match built {
            Ok(table) => table,
            Err(err) => unreachable!("built-in route table is invalid: {err}"),
        }
    }

    /// Build from configured `[[routes]]`, or the built-in table when none are configured.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, RouteTableError> {
        match config.routes() {
            Some(entries) => Self::from_entries(entries),
            None => Ok(Self::console_default()),
        }
    }

    pub fn from_entries(entries: &[RouteEntry]) -> Result<Self, RouteTableError> {
        let mut builder = Self::builder();
        for entry in entries {
            if entry.is_contradictory() {
                tracing::warn!(
                    path = %entry.descriptor().path(),
                    "Route is marked both public and admin; treating it as public"
                );
            }
            builder = builder.route(entry.descriptor().clone());
        }
        builder.build()
    }

    /// Look up a raw path. Never fails; see [`RouteTable::fallback`].
    #[must_use]
    pub fn resolve(&self, raw: &str) -> &RouteDescriptor {
        match RoutePath::parse(raw) {
            Ok(path) => self.get(&path).unwrap_or(&self.fallback),
            Err(err) => {
                tracing::debug!(raw, "Unparsable navigation path: {err}");
                &self.fallback
            }
        }
    }

    #[must_use]
    pub fn get(&self, path: &RoutePath) -> Option<&RouteDescriptor> {
        self.index
            .get(&lookup_key(path))
            .map(|&position| &self.routes[position])
    }

    /// The wildcard descriptor returned for unknown paths.
    #[must_use]
    pub fn fallback(&self) -> &RouteDescriptor {
        &self.fallback
    }

    pub fn iter(&self) -> slice::Iter<'_, RouteDescriptor> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Titled pages the session may open, in table order.
    #[must_use]
    pub fn menu(&self, session: &Session) -> Vec<&RouteDescriptor> {
        self.routes
            .iter()
            .filter(|route| route.title().is_some() && route.redirect().is_none())
            .filter(|route| gateway::decide(route, session).is_allowed())
            .collect()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteDescriptor;
    type IntoIter = slice::Iter<'a, RouteDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

fn lookup_key(path: &RoutePath) -> String {
    path.as_str().to_lowercase()
}

fn fixed_path(raw: &str) -> RoutePath {
    match RoutePath::parse(raw) {
        Ok(path) => path,
        Err(err) => unreachable!("built-in route path {raw:?} is invalid: {err}"),
    }
}

fn wildcard_path() -> RoutePath {
    fixed_path(WILDCARD_PATH)
}
