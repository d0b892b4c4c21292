use ::rclrs::{QoSDurabilityPolicy, QoSHistoryPolicy, QoSProfile, QoSReliabilityPolicy};
use rosunity_core::qos::{Durability, History, QosProfile, Reliability};

pub(crate) fn to_rclrs(qos: &QosProfile) -> QoSProfile {
    let history = match qos.history {
        History::KeepLast { depth } => QoSHistoryPolicy::KeepLast { depth },
        History::KeepAll => QoSHistoryPolicy::KeepAll,
        History::SystemDefault => QoSHistoryPolicy::SystemDefault { depth: 0 },
    };
    let reliability = match qos.reliability {
        Reliability::Reliable => QoSReliabilityPolicy::Reliable,
        Reliability::BestEffort => QoSReliabilityPolicy::BestEffort,
        Reliability::SystemDefault => QoSReliabilityPolicy::SystemDefault,
    };
    let durability = match qos.durability {
        Durability::Volatile => QoSDurabilityPolicy::Volatile,
        Durability::TransientLocal => QoSDurabilityPolicy::TransientLocal,
        Durability::SystemDefault => QoSDurabilityPolicy::SystemDefault,
    };

    QoSProfile {
        history,
        reliability,
        durability,
        ..::rclrs::QOS_PROFILE_DEFAULT
    }
}
