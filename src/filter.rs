use std::collections::BTreeSet;

use crate::sink::Direction;

/// Per-direction packet selection. A packet is logged only when the set for
/// its direction is non-empty and some entry equals the type name or is a
/// suffix of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketFilter {
    inbound: BTreeSet<String>,
    outbound: BTreeSet<String>,
}

impl PacketFilter {
    pub fn new<I, O, S, T>(inbound: I, outbound: O) -> Self
    where
        I: IntoIterator<Item = S>,
        O: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            inbound: inbound.into_iter().map(Into::into).collect(),
            outbound: outbound.into_iter().map(Into::into).collect(),
        }
    }

    pub fn should_log(&self, direction: Direction, type_name: &str) -> bool {
        let selected = match direction {
            Direction::Inbound => &self.inbound,
            Direction::Outbound => &self.outbound,
        };
        matches_selection(selected, type_name)
    }

    pub fn inbound(&self) -> &BTreeSet<String> {
        &self.inbound
    }

    pub fn outbound(&self) -> &BTreeSet<String> {
        &self.outbound
    }
}

/// Equality or `ends_with` against any selected entry; an empty selection
/// matches nothing.
pub fn matches_selection<'a, I>(selected: I, type_name: &str) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    selected
        .into_iter()
        .any(|s| type_name == s.as_str() || type_name.ends_with(s.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_selection() {
        let filter = PacketFilter::new(["SpawnS2CPacket"], Vec::<String>::new());
        assert!(filter.should_log(Direction::Inbound, "EntitySpawnS2CPacket"));
        assert!(filter.should_log(Direction::Inbound, "SpawnS2CPacket"));
        assert!(!filter.should_log(Direction::Inbound, "EntitySpawn"));
        assert!(!filter.should_log(Direction::Outbound, "EntitySpawnS2CPacket"));
    }

    #[test]
    fn test_empty_selection_logs_nothing() {
        let filter = PacketFilter::default();
        assert!(!filter.should_log(Direction::Inbound, "BlockUpdateS2CPacket"));
        assert!(!filter.should_log(Direction::Outbound, "ClickSlotC2SPacket"));
    }

    #[test]
    fn test_directions_are_independent() {
        let filter = PacketFilter::new(["BlockUpdateS2CPacket"], ["ClickSlotC2SPacket"]);
        assert!(filter.should_log(Direction::Inbound, "BlockUpdateS2CPacket"));
        assert!(!filter.should_log(Direction::Inbound, "ClickSlotC2SPacket"));
        assert!(filter.should_log(Direction::Outbound, "ClickSlotC2SPacket"));
        assert_eq!(filter.inbound().len(), 1);
        assert_eq!(filter.outbound().len(), 1);
    }
}
