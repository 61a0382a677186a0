mod tests {
    use octo_ws2811::config::{
        WS2811_400KHZ, WS2811_800KHZ, WS2811_GBR, WS2811_GRB, WS2811_RBG, WS2811_RGB,
    };
    use octo_ws2811::layout::Rgb;
    use octo_ws2811::{BitRate, ColorOrder, Config, Error, WaveformTiming};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bit_rate, BitRate::Khz800);
        assert_eq!(config.color_order, ColorOrder::Grb);
        assert_eq!(config.timing, WaveformTiming::DEFAULT);
        assert_eq!(config.bits(), WS2811_GRB | WS2811_800KHZ);
    }

    #[test]
    fn test_from_bits() {
        let config = Config::from_bits(WS2811_GBR | WS2811_400KHZ).unwrap();
        assert_eq!(config.bit_rate, BitRate::Khz400);
        assert_eq!(config.color_order, ColorOrder::Gbr);

        let config = Config::try_from(WS2811_RGB).unwrap();
        assert_eq!(config.bit_rate, BitRate::Khz800);
        assert_eq!(config.color_order, ColorOrder::Rgb);
    }

    #[test]
    fn test_bits_round_trip() {
        for order in [WS2811_RGB, WS2811_RBG, WS2811_GRB, WS2811_GBR] {
            for rate in [WS2811_800KHZ, WS2811_400KHZ] {
                let bits = order | rate;
                assert_eq!(Config::from_bits(bits).unwrap().bits(), bits);
            }
        }
    }

    #[test]
    fn test_unknown_bits_rejected() {
        assert_eq!(Config::from_bits(0x20), Err(Error::InvalidConfig(0x20)));
        assert_eq!(Config::from_bits(0x84), Err(Error::InvalidConfig(0x84)));
    }

    #[test]
    fn test_color_order_pack() {
        let color = Rgb::new(0x11, 0x22, 0x33);
        assert_eq!(ColorOrder::Rgb.pack(color), 0x11_22_33);
        assert_eq!(ColorOrder::Rbg.pack(color), 0x11_33_22);
        assert_eq!(ColorOrder::Grb.pack(color), 0x22_11_33);
        assert_eq!(ColorOrder::Gbr.pack(color), 0x22_33_11);
        for order in [
            ColorOrder::Rgb,
            ColorOrder::Rbg,
            ColorOrder::Grb,
            ColorOrder::Gbr,
        ] {
            assert_eq!(order.unpack(order.pack(color)), color);
        }
    }
}
