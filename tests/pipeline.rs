mod tests {
    use octo_ws2811::pipeline::{
        ChannelSet, DmaChannel, Edge, MAX_BIT_TIMES, Pipeline, PortRegister, Trigger,
    };
    use octo_ws2811::waveform::Waveform;
    use octo_ws2811::{Error, frame_len};

    #[test]
    fn test_channel_set() {
        assert_eq!(ChannelSet::ALL.bits(), 0x0E);
        for channel in DmaChannel::ALL {
            assert!(ChannelSet::ALL.contains(channel));
        }
    }

    #[test]
    fn test_identical_transfer_counts() {
        let frame = [0_u8; frame_len(5)];
        let pipeline = Pipeline::new(frame.len()).unwrap();
        for descriptor in pipeline.descriptors(frame.as_ptr()) {
            assert_eq!(usize::from(descriptor.major_count), frame.len());
            assert_eq!(descriptor.minor_bytes, 1);
            assert!(descriptor.disable_on_complete);
        }
    }

    #[test]
    fn test_set_high_descriptor() {
        let frame = [0_u8; frame_len(1)];
        let pipeline = Pipeline::new(frame.len()).unwrap();
        let descriptor = pipeline.descriptor(DmaChannel::SetHigh, frame.as_ptr());
        assert_eq!(descriptor.destination, PortRegister::Set);
        assert_eq!(descriptor.source_offset, 0);
        assert_eq!(descriptor.source_last_adjust, 0);
        assert!(!descriptor.interrupt_on_complete);
        // SAFETY: constant sources point at a static byte.
        assert_eq!(unsafe { *descriptor.source }, 0xFF);
        assert_eq!(descriptor.trigger, Trigger::new(Waveform::Zero, Edge::Rising));
    }

    #[test]
    fn test_apply_data_descriptor() {
        let frame = [0_u8; frame_len(2)];
        let pipeline = Pipeline::new(frame.len()).unwrap();
        let descriptor = pipeline.descriptor(DmaChannel::ApplyData, frame.as_ptr());
        assert_eq!(descriptor.destination, PortRegister::Data);
        assert_eq!(descriptor.source, frame.as_ptr());
        assert_eq!(descriptor.source_offset, 1);
        assert_eq!(descriptor.source_last_adjust, -48);
        assert!(!descriptor.interrupt_on_complete);
        assert_eq!(descriptor.trigger, Trigger::new(Waveform::Zero, Edge::Falling));
    }

    #[test]
    fn test_clear_all_descriptor() {
        let frame = [0_u8; frame_len(1)];
        let pipeline = Pipeline::new(frame.len()).unwrap();
        let descriptor = pipeline.descriptor(DmaChannel::ClearAll, frame.as_ptr());
        assert_eq!(descriptor.destination, PortRegister::Clear);
        assert!(descriptor.interrupt_on_complete);
        // SAFETY: constant sources point at a static byte.
        assert_eq!(unsafe { *descriptor.source }, 0xFF);
        assert_eq!(descriptor.trigger, Trigger::new(Waveform::One, Edge::Falling));
    }

    #[test]
    fn test_frame_too_long() {
        assert!(Pipeline::new(MAX_BIT_TIMES).is_ok());
        assert_eq!(
            Pipeline::new(MAX_BIT_TIMES + 1),
            Err(Error::FrameTooLong {
                bit_times: MAX_BIT_TIMES + 1
            })
        );
    }

    #[test]
    fn test_empty_frame_rejected() {
        assert_eq!(Pipeline::new(0), Err(Error::EmptyFrame));
        assert_eq!(Pipeline::new(1).map(|pipeline| pipeline.bit_times()), Ok(1));
    }
}
