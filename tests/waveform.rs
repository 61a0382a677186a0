mod tests {
    use octo_ws2811::waveform::{T0H, T1H, Waveform, WaveformConfig};
    use octo_ws2811::{BitRate, WaveformTiming};

    #[test]
    fn test_frequencies() {
        assert_eq!(BitRate::Khz800.frequency_hz(), 800_000);
        assert_eq!(BitRate::Khz400.frequency_hz(), 400_000);
    }

    #[test]
    fn test_tuned_duty() {
        let config = WaveformConfig::new(BitRate::Khz800, WaveformTiming::default());
        assert_eq!(config.resolution_bits, 8);
        assert_eq!(config.duty(Waveform::Zero), T0H);
        assert_eq!(config.duty(Waveform::One), T1H);
        assert_eq!((T0H, T1H), (60, 176));
    }

    #[test]
    fn test_high_times() {
        let fast = WaveformConfig::new(BitRate::Khz800, WaveformTiming::DEFAULT);
        assert_eq!(fast.bit_period_ns(), 1250);
        assert_eq!(fast.high_time_ns(Waveform::Zero), 292);
        assert_eq!(fast.high_time_ns(Waveform::One), 859);

        let slow = WaveformConfig::new(BitRate::Khz400, WaveformTiming::DEFAULT);
        assert_eq!(slow.bit_period_ns(), 2500);
        assert_eq!(slow.high_time_ns(Waveform::Zero), 585);
        assert_eq!(slow.high_time_ns(Waveform::One), 1718);
    }
}
