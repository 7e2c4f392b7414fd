mod tests {
    use std::time::Duration;

    use lampf_ble::color::Rgb;
    use lampf_ble::lamp::{ImmediateLight, NullObserver};
    use lampf_ble::protocol::Scene;
    use lampf_ble::script::{parse_script, run, Action};
    use lampf_ble::transport::{LampAddress, LampIdentity, MemoryTransport};
    use lampf_ble::{Error, LampF};

    fn words(script: &str) -> Vec<&str> {
        script.split_whitespace().collect()
    }

    #[test]
    fn test_parse_actions() {
        let actions = parse_script(words(
            "connect scene candle_light color f080f0 color none power off on on 40 off \
             top-temperature 3000 bottom-temperature 2800 brightness 12 sleep 5 disconnect",
        ))
        .unwrap();

        assert_eq!(
            actions,
            vec![
                Action::Connect,
                Action::Scene(Scene::CandleLight),
                Action::Color(Some(Rgb::new(0xF0, 0x80, 0xF0))),
                Action::Color(None),
                Action::Power(false),
                Action::TurnOn(None),
                Action::TurnOn(Some(40)),
                Action::TurnOff,
                Action::TopTemperature(3000),
                Action::BottomTemperature(2800),
                Action::BottomBrightness(12),
                Action::Sleep(Duration::from_millis(5)),
                Action::Disconnect,
            ]
        );
    }

    #[test]
    fn test_parse_light() {
        let actions = parse_script(words(
            "light bottom-brightness=10 bottom-temperature=250 top=ff7777 scene bright",
        ))
        .unwrap();

        assert_eq!(
            actions,
            vec![
                Action::Light(
                    ImmediateLight::new()
                        .bottom_brightness(10)
                        .bottom_temperature(250)
                        .top_color(Rgb::new(0xFF, 0x77, 0x77))
                ),
                Action::Scene(Scene::Bright),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        for script in [
            "dance",
            "scene",
            "scene disco",
            "color",
            "color 12345",
            "power maybe",
            "brightness 300",
            "sleep soon",
            "light top=ff7777 glow=1",
            "light top",
        ] {
            let result = parse_script(words(script));
            assert!(
                matches!(result, Err(Error::InvalidArgument(_)) | Err(Error::Protocol(_))),
                "{}",
                script
            );
        }
    }

    #[test]
    fn test_run_script() {
        let transport = MemoryTransport::new();
        let identity = LampIdentity::new(LampAddress::new([1, 2, 3, 4, 5, 6]));
        let mut lamp = LampF::new(identity, transport.clone()).with_observer(NullObserver);

        let actions = parse_script(words("scene indirect light bottom-brightness=99 disconnect")).unwrap();
        run(&mut lamp, &actions).unwrap();

        assert_eq!(transport.writes().len(), 2);
        assert_eq!(lamp.bottom_brightness(), 99);
        assert!(!transport.is_connected());
    }
}
