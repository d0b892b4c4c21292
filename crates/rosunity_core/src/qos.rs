//! Transport-agnostic QoS profile. Transports convert it to their own type;
//! negotiation stays with the ROS client library.

/// History policy plus queue depth.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum History {
    KeepLast { depth: u32 },
    KeepAll,
    SystemDefault,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reliability {
    Reliable,
    BestEffort,
    SystemDefault,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Durability {
    Volatile,
    TransientLocal,
    SystemDefault,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct QosProfile {
    pub history: History,
    pub reliability: Reliability,
    pub durability: Durability,
}

impl QosProfile {
    /// `rmw_qos_profile_default`: keep last 10, reliable, volatile.
    pub const DEFAULT: Self = Self {
        history: History::KeepLast { depth: 10 },
        reliability: Reliability::Reliable,
        durability: Durability::Volatile,
    };

    /// `rmw_qos_profile_sensor_data`: keep last 5, best effort, volatile.
    pub const SENSOR_DATA: Self = Self {
        history: History::KeepLast { depth: 5 },
        reliability: Reliability::BestEffort,
        durability: Durability::Volatile,
    };

    /// `rmw_qos_profile_services_default`.
    pub const SERVICES_DEFAULT: Self = Self::DEFAULT;

    pub const SYSTEM_DEFAULT: Self = Self {
        history: History::SystemDefault,
        reliability: Reliability::SystemDefault,
        durability: Durability::SystemDefault,
    };

    pub fn keep_last(mut self, depth: u32) -> Self {
        self.history = History::KeepLast { depth };
        self
    }

    pub fn keep_all(mut self) -> Self {
        self.history = History::KeepAll;
        self
    }

    pub fn reliable(mut self) -> Self {
        self.reliability = Reliability::Reliable;
        self
    }

    pub fn best_effort(mut self) -> Self {
        self.reliability = Reliability::BestEffort;
        self
    }

    pub fn transient_local(mut self) -> Self {
        self.durability = Durability::TransientLocal;
        self
    }

    pub fn volatile(mut self) -> Self {
        self.durability = Durability::Volatile;
        self
    }
}

impl Default for QosProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}
