use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::{
    dataset::{Dataset, Relation},
    error::{PredicateError, SpecError},
    set::{EntityId, EntitySet},
};

/// Membership test performed against a tag or color relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MembershipOp {
    /// At least one relation row names the value.
    Has,
    /// The entity carries exactly one relation row, and it names the value.
    HasOnly,
}

impl MembershipOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipOp::Has => "has",
            MembershipOp::HasOnly => "has_only",
        }
    }
}

impl FromStr for MembershipOp {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "has" => Ok(MembershipOp::Has),
            "has_only" => Ok(MembershipOp::HasOnly),
            other => Err(SpecError::UnknownOperation {
                kind: "membership",
                operation: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for MembershipOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Default)]
struct RowTally {
    total: usize,
    named: bool,
}

/// Tag or color membership predicate.
///
/// For `has`, inversion applies to each relation row: an inverted `has "x"`
/// matches entities carrying any row other than `x`. For `has_only`, the
/// named value must always be present and inversion only switches the
/// cardinality test from "exactly one row" to "more than one row".
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipPredicate {
    pub(crate) op: MembershipOp,
    pub(crate) value: String,
    pub(crate) inverted: bool,
}

impl MembershipPredicate {
    #[must_use]
    pub fn new(op: MembershipOp, value: impl Into<String>) -> Self {
        Self {
            op,
            value: value.into(),
            inverted: false,
        }
    }

    #[must_use]
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub(crate) fn evaluate<D>(
        &self,
        dataset: &D,
        relation: Relation,
    ) -> Result<EntitySet, PredicateError>
    where
        D: Dataset + ?Sized,
    {
        if !dataset.has_relation_value(relation, &self.value) {
            return Err(PredicateError::LookupMiss {
                relation: relation.as_str(),
                name: self.value.clone(),
            });
        }

        match self.op {
            MembershipOp::Has => Ok(dataset
                .relation_rows(relation)
                .filter(|(_, name)| (*name == self.value) != self.inverted)
                .map(|(entity, _)| entity)
                .collect()),
            MembershipOp::HasOnly => {
                let mut tallies: BTreeMap<EntityId, RowTally> = BTreeMap::new();
                for (entity, name) in dataset.relation_rows(relation) {
                    let tally = tallies.entry(entity).or_default();
                    tally.total += 1;
                    tally.named |= name == self.value;
                }
                Ok(tallies
                    .into_iter()
                    .filter(|(_, tally)| {
                        tally.named
                            && if self.inverted {
                                tally.total > 1
                            } else {
                                tally.total == 1
                            }
                    })
                    .map(|(entity, _)| entity)
                    .collect())
            }
        }
    }
}
