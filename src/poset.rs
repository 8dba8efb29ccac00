use std::{
    collections::{BTreeSet, HashMap},
    fmt, iter,
};

use ordermap::OrderMap;
use petgraph::{
    algo::toposort,
    graphmap::DiGraphMap,
    Direction::{Incoming, Outgoing},
};

use crate::error::{InvariantViolation, PosetError};

/// Internal id of an element, stable while the element is live.
///
/// Ids are handed out in increasing order and never reused within a poset,
/// except that [`Poset::clear`] starts counting from zero again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A set of named elements with a reflexive, antisymmetric, transitive
/// relation between them.
///
/// The relation is stored fully closed: every pair `a <= b` that holds has an
/// edge `a -> b`, including the self loop `a -> a`. Both views of an element
/// (everything below it, everything above it) are read off the same graph, so
/// they can never disagree.
#[derive(Debug, Clone, Default)]
pub struct Poset {
    /// Element name -> id, in insertion order
    names: OrderMap<String, ElementId>,
    /// Next unused id
    next_id: u64,
    /// Edge `a -> b` iff `a <= b`
    relation: DiGraphMap<ElementId, ()>,
}

impl Poset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: OrderMap::with_capacity(capacity),
            next_id: 0,
            relation: DiGraphMap::with_capacity(capacity, capacity * 2),
        }
    }

    /// Builds a poset from rows of names, each row read as a chain.
    ///
    /// Every name becomes one element, however many rows mention it, and
    /// consecutive names in a row are related `row[i] <= row[i + 1]`. Pairs
    /// already implied by earlier rows are skipped.
    ///
    /// # Errors
    ///
    /// Fails with [`PosetError::InvalidArgument`] on an empty name, and with
    /// [`PosetError::AlreadyComparable`] when a row orders two elements the
    /// other way round from what earlier rows established.
    pub fn from_chains<K: AsRef<str>>(rows: &[Vec<K>]) -> Result<Self, PosetError> {
        let mut poset = Self::new();
        for row in rows {
            for name in row {
                let name = name.as_ref();
                if !poset.contains(name) {
                    poset.insert(name)?;
                }
            }
        }
        for row in rows {
            for pair in row.windows(2) {
                let (lesser, greater) = (pair[0].as_ref(), pair[1].as_ref());
                if !poset.test(lesser, greater) {
                    poset.add_relation(lesser, greater)?;
                }
            }
        }
        Ok(poset)
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    #[must_use]
    pub fn id(&self, name: &str) -> Option<ElementId> {
        self.names.get(name).copied()
    }

    /// Element names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.keys().map(String::as_str)
    }

    /// Adds a new element, related only to itself.
    ///
    /// # Errors
    ///
    /// [`PosetError::InvalidArgument`] for an empty name,
    /// [`PosetError::DuplicateName`] if the name is taken.
    pub fn insert(&mut self, name: &str) -> Result<ElementId, PosetError> {
        if name.is_empty() {
            return Err(PosetError::InvalidArgument);
        }
        if self.names.contains_key(name) {
            return Err(PosetError::DuplicateName(name.to_owned()));
        }

        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.relation.add_node(id);
        self.relation.add_edge(id, id, ());
        self.names.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Removes an element together with every relation touching it.
    ///
    /// The remaining relation is not re-derived: two elements that were only
    /// related through the removed one stay related, since the closure edge
    /// between them is already materialized.
    ///
    /// # Errors
    ///
    /// [`PosetError::InvalidArgument`] or [`PosetError::NameNotFound`].
    pub fn remove(&mut self, name: &str) -> Result<ElementId, PosetError> {
        let id = self.lookup(name)?;
        self.relation.remove_node(id);
        self.names.remove(name);
        Ok(id)
    }

    /// Whether `lesser <= greater` holds. False if either element is absent.
    #[must_use]
    pub fn test(&self, lesser: &str, greater: &str) -> bool {
        match (self.names.get(lesser), self.names.get(greater)) {
            (Some(&a), Some(&b)) => self.relation.contains_edge(a, b),
            _ => false,
        }
    }

    /// Establishes `lesser <= greater` and closes the relation under
    /// transitivity.
    ///
    /// Everything at or below `lesser` becomes related to everything at or
    /// above `greater`.
    ///
    /// # Errors
    ///
    /// [`PosetError::InvalidArgument`], [`PosetError::NameNotFound`], or
    /// [`PosetError::AlreadyComparable`] when the two elements are equal or
    /// already ordered either way.
    pub fn add_relation(&mut self, lesser: &str, greater: &str) -> Result<(), PosetError> {
        let a = self.lookup(lesser)?;
        let b = self.lookup(greater)?;
        if self.relation.contains_edge(a, b) || self.relation.contains_edge(b, a) {
            return Err(PosetError::AlreadyComparable {
                lesser: lesser.to_owned(),
                greater: greater.to_owned(),
            });
        }

        let below: Vec<ElementId> = self.down_ids(a).collect();
        let above: Vec<ElementId> = self.up_ids(b).collect();
        for &x in &below {
            for &y in &above {
                self.relation.add_edge(x, y, ());
            }
        }
        tracing::trace!(
            lesser,
            greater,
            edges = below.len() * above.len(),
            "closed relation"
        );
        Ok(())
    }

    /// Deletes `lesser <= greater`, provided it is a covering pair.
    ///
    /// Only that one edge goes; the rest of the relation is unchanged, which
    /// keeps it transitive because nothing lies strictly between the two.
    ///
    /// # Errors
    ///
    /// [`PosetError::InvalidArgument`], [`PosetError::NameNotFound`],
    /// [`PosetError::NotRelated`] if `lesser <= greater` does not hold, or
    /// [`PosetError::NotCoveringRelation`] if the pair is reflexive or some
    /// third element sits between them.
    pub fn remove_relation(&mut self, lesser: &str, greater: &str) -> Result<(), PosetError> {
        let a = self.lookup(lesser)?;
        let b = self.lookup(greater)?;
        if a != b && !self.relation.contains_edge(a, b) {
            return Err(PosetError::NotRelated {
                lesser: lesser.to_owned(),
                greater: greater.to_owned(),
            });
        }
        if a == b || self.has_between(a, b) {
            return Err(PosetError::NotCoveringRelation {
                lesser: lesser.to_owned(),
                greater: greater.to_owned(),
            });
        }

        self.relation.remove_edge(a, b);
        Ok(())
    }

    /// Drops every element and relation and restarts ids from zero.
    pub fn clear(&mut self) {
        self.names.clear();
        self.relation.clear();
        self.next_id = 0;
    }

    /// Names of the elements `<= name`, the element itself included.
    ///
    /// # Errors
    ///
    /// [`PosetError::InvalidArgument`] or [`PosetError::NameNotFound`].
    pub fn down_set(&self, name: &str) -> Result<Vec<&str>, PosetError> {
        let id = self.lookup(name)?;
        Ok(self.named(|x| self.relation.contains_edge(x, id)))
    }

    /// Names of the elements `>= name`, the element itself included.
    ///
    /// # Errors
    ///
    /// [`PosetError::InvalidArgument`] or [`PosetError::NameNotFound`].
    pub fn up_set(&self, name: &str) -> Result<Vec<&str>, PosetError> {
        let id = self.lookup(name)?;
        Ok(self.named(|x| self.relation.contains_edge(id, x)))
    }

    /// Elements with nothing strictly below them.
    #[must_use]
    pub fn minimal(&self) -> Vec<&str> {
        self.named(|x| self.down_ids(x).all(|y| y == x))
    }

    /// Elements with nothing strictly above them.
    #[must_use]
    pub fn maximal(&self) -> Vec<&str> {
        self.named(|x| self.up_ids(x).all(|y| y == x))
    }

    /// Hasse edges: pairs `(a, b)` with `a < b` and nothing strictly between.
    #[must_use]
    pub fn covers(&self) -> Vec<(&str, &str)> {
        let mut covers = Vec::new();
        for (lesser, &a) in &self.names {
            for (greater, &b) in &self.names {
                if a != b && self.relation.contains_edge(a, b) && !self.has_between(a, b) {
                    covers.push((lesser.as_str(), greater.as_str()));
                }
            }
        }
        covers
    }

    /// Pairs related in neither direction, each listed once in insertion
    /// order.
    #[must_use]
    pub fn incomparable_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for (i, (first, &a)) in self.names.iter().enumerate() {
            for (second, &b) in self.names.iter().skip(i + 1) {
                if !self.relation.contains_edge(a, b) && !self.relation.contains_edge(b, a) {
                    pairs.push((first.as_str(), second.as_str()));
                }
            }
        }
        pairs
    }

    /// One total order of the elements that respects the relation.
    ///
    /// # Errors
    ///
    /// [`InvariantViolation::Cycle`] if the stored relation is not
    /// antisymmetric, which no sequence of public operations can produce.
    pub fn linear_extension(&self) -> Result<Vec<&str>, InvariantViolation> {
        let mut strict: DiGraphMap<ElementId, ()> =
            DiGraphMap::with_capacity(self.names.len(), self.relation.edge_count());
        for &id in self.names.values() {
            strict.add_node(id);
        }
        for (a, b, _) in self.relation.all_edges() {
            if a != b {
                strict.add_edge(a, b, ());
            }
        }

        let order = toposort(&strict, None)
            .map_err(|cycle| InvariantViolation::Cycle(cycle.node_id()))?;

        let labels: HashMap<ElementId, &str> =
            self.names.iter().map(|(name, &id)| (id, name.as_str())).collect();
        Ok(order.into_iter().filter_map(|id| labels.get(&id).copied()).collect())
    }

    /// Verifies that the stored relation is exactly a partial order over the
    /// named elements.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut named = BTreeSet::new();
        for &id in self.names.values() {
            if !named.insert(id) {
                return Err(InvariantViolation::SharedId(id));
            }
        }
        if let Some(id) = self.relation.nodes().find(|id| !named.contains(id)) {
            return Err(InvariantViolation::Dangling(id));
        }
        if let Some(&id) = named.iter().find(|&&id| !self.relation.contains_edge(id, id)) {
            return Err(InvariantViolation::Reflexivity(id));
        }

        for (a, b, _) in self.relation.all_edges() {
            if a != b && self.relation.contains_edge(b, a) {
                return Err(InvariantViolation::Antisymmetry(a, b));
            }
            for c in self.relation.neighbors_directed(b, Outgoing) {
                if !self.relation.contains_edge(a, c) {
                    return Err(InvariantViolation::Transitivity(a, b, c));
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<ElementId, PosetError> {
        if name.is_empty() {
            return Err(PosetError::InvalidArgument);
        }
        self.id(name)
            .ok_or_else(|| PosetError::NameNotFound(name.to_owned()))
    }

    /// `id` and every element below it
    fn down_ids(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        iter::once(id).chain(
            self.relation
                .neighbors_directed(id, Incoming)
                .filter(move |&x| x != id),
        )
    }

    /// `id` and every element above it
    fn up_ids(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        iter::once(id).chain(
            self.relation
                .neighbors_directed(id, Outgoing)
                .filter(move |&x| x != id),
        )
    }

    /// Whether some third element `x` has `a <= x <= b`.
    fn has_between(&self, a: ElementId, b: ElementId) -> bool {
        self.up_ids(a)
            .any(|x| x != a && x != b && self.relation.contains_edge(x, b))
    }

    fn named(&self, mut keep: impl FnMut(ElementId) -> bool) -> Vec<&str> {
        self.names
            .iter()
            .filter(|(_, &id)| keep(id))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
