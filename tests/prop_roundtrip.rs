use ofcodec::openflow::messages::multipart::PortStats;
use ofcodec::openflow::messages::{Hello, Message, MultipartReply, MultipartReplyBody, SwitchConfig};
use ofcodec::openflow::version::Version;
use ofcodec::openflow::Codec;
use proptest::prelude::*;

fn version_strategy() -> impl Strategy<Value = Version> {
    prop_oneof![
        Just(Version::V1_0),
        Just(Version::V1_3),
        Just(Version::V1_4),
        Just(Version::V1_5),
    ]
}

prop_compose! {
    fn port_stats_strategy(with_duration: bool)(
        port_no in 1u32..0xff00,
        counters in prop::collection::vec(any::<u64>(), 12),
        duration in (any::<u32>(), 0u32..1_000_000_000),
    ) -> PortStats {
        let (duration_sec, duration_nsec) = if with_duration { duration } else { (0, 0) };
        PortStats {
            port_no,
            rx_packets: counters[0],
            tx_packets: counters[1],
            rx_bytes: counters[2],
            tx_bytes: counters[3],
            rx_dropped: counters[4],
            tx_dropped: counters[5],
            rx_errors: counters[6],
            tx_errors: counters[7],
            rx_frame_err: counters[8],
            rx_over_err: counters[9],
            rx_crc_err: counters[10],
            collisions: counters[11],
            duration_sec,
            duration_nsec,
        }
    }
}

fn roundtrip(version: Version, xid: u32, message: &Message) -> std::result::Result<(), TestCaseError> {
    let codec = Codec::with_defaults();
    let bytes = codec.to_bytes(version, xid, message).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(bytes.len(), ofcodec::openflow::frame_length(&bytes).unwrap_or(0));
    let decoded = codec.decode(&bytes).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(version, decoded.version);
    prop_assert_eq!(xid, decoded.xid);
    prop_assert_eq!(message, &decoded.message);
    let again = codec.to_bytes(version, xid, &decoded.message).map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(bytes, again);
    Ok(())
}

proptest! {
    #[test]
    fn prop_echo_roundtrip(
        version in version_strategy(),
        xid in any::<u32>(),
        data in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        roundtrip(version, xid, &Message::EchoRequest(data.clone()))?;
        roundtrip(version, xid, &Message::EchoReply(data))?;
    }

    #[test]
    fn prop_switch_config_roundtrip(
        version in version_strategy(),
        flags in 0u16..4,
        miss_send_len in any::<u16>(),
    ) {
        let config = SwitchConfig { flags, miss_send_len };
        roundtrip(version, 1, &Message::SetConfig(config))?;
        roundtrip(version, 2, &Message::GetConfigReply(config))?;
    }

    #[test]
    fn prop_hello_bitmap_roundtrip(
        version in prop_oneof![Just(Version::V1_3), Just(Version::V1_4), Just(Version::V1_5)],
        offered in prop::sample::subsequence(Version::ALL.to_vec(), 1..=4),
    ) {
        let hello = Hello::with_versions(&offered);
        prop_assert_eq!(offered.clone(), hello.versions());
        roundtrip(version, 3, &Message::Hello(hello))?;
    }

    #[test]
    fn prop_port_stats_v13_roundtrip(
        ports in prop::collection::vec(port_stats_strategy(true), 0..8),
        more in any::<bool>(),
    ) {
        let reply = MultipartReply {
            more,
            body: MultipartReplyBody::PortStats(ports),
        };
        roundtrip(Version::V1_3, 4, &Message::MultipartReply(reply))?;
    }

    #[test]
    fn prop_port_stats_v10_roundtrip(ports in prop::collection::vec(port_stats_strategy(false), 0..8)) {
        let reply = MultipartReply {
            more: false,
            body: MultipartReplyBody::PortStats(ports),
        };
        roundtrip(Version::V1_0, 5, &Message::MultipartReply(reply))?;
    }

    #[test]
    fn prop_garbage_frames_never_panic(
        data in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let codec = Codec::with_defaults();
        let _ = codec.decode(&data);
    }

    #[test]
    fn prop_random_bodies_behind_valid_headers_never_panic(
        wire_version in prop::sample::select(vec![0x01u8, 0x04, 0x05, 0x06]),
        typ in 0u8..=30,
        xid in any::<u32>(),
        body in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let len = (8 + body.len()) as u16;
        let mut frame = vec![wire_version, typ, (len >> 8) as u8, len as u8];
        frame.extend_from_slice(&xid.to_be_bytes());
        frame.extend_from_slice(&body);
        prop_assert_eq!(Some(frame.len()), ofcodec::openflow::frame_length(&frame));
        let codec = Codec::with_defaults();
        if let Ok(decoded) = codec.decode(&frame) {
            prop_assert_eq!(xid, decoded.xid);
        }
    }
}
