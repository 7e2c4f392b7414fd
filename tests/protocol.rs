mod tests {
    use lampf_ble::color::Rgb;
    use lampf_ble::protocol::{BottomBlock, Command, ProtocolError, Scene, TopBlock};

    #[test]
    fn test_scene_packet() {
        assert_eq!(
            Command::SelectScene(Scene::Indirect).encode(),
            vec![0xA0, 0x02, 0x05, 0x05]
        );
        assert_eq!(
            Command::SelectScene(Scene::Default).encode(),
            vec![0xA0, 0x02, 0x05, 0xFF]
        );
        assert_eq!(
            Command::SelectScene(Scene::Shutdown).encode(),
            vec![0xA0, 0x02, 0x05, 0x00]
        );
    }

    #[test]
    fn test_top_temperature_packet() {
        let packet = Command::TopTemperature(3400).encode();
        assert_eq!(packet, vec![0xA0, 0x02, 0x04, 0x0D, 0x48]);
        assert_eq!(packet.len(), 5);
    }

    #[test]
    fn test_immediate_light_lengths() {
        let top = TopBlock::from_color(Rgb::new(255, 0, 0));
        let bottom = BottomBlock { temperature: 2700, brightness: 10 };

        let cases = [
            (Some(top), None, 0x01, 10),
            (None, Some(bottom), 0x02, 9),
            (Some(top), Some(bottom), 0x03, 13),
        ];
        for (top, bottom, content, len) in cases {
            let command = Command::immediate_light(top, bottom).unwrap();
            let packet = command.encode();
            assert_eq!(packet.len(), len);
            assert_eq!(command.len(), len);
            assert_eq!(&packet[..6], &[0xA0, 0x01, 0x02, content, 0x00, 0x00]);
        }

        assert_eq!(Command::immediate_light(None, None), None);
    }

    #[test]
    fn test_immediate_light_layout() {
        let command = Command::ImmediateLight {
            top: Some(TopBlock { saturation: 0x11, hue: 0x2233, brightness: 0x44 }),
            bottom: Some(BottomBlock { temperature: 0x0FA0, brightness: 0x55 }),
        };
        assert_eq!(
            command.encode(),
            vec![0xA0, 0x01, 0x02, 0x03, 0x00, 0x00, 0x11, 0x22, 0x33, 0x44, 0x0F, 0xA0, 0x55]
        );
    }

    #[test]
    fn test_top_block_quantization() {
        let red = TopBlock::from_color(Rgb::new(255, 0, 0));
        assert_eq!(red, TopBlock { saturation: 255, hue: 0, brightness: 128 });

        let black = TopBlock::from_color(Rgb::BLACK);
        assert_eq!(black, TopBlock { saturation: 0, hue: 0, brightness: 0 });

        let green = TopBlock::from_color(Rgb::new(0, 255, 0));
        assert_eq!(green.hue, 21845);

        let pink = TopBlock::from_color(Rgb::new(0xF0, 0x80, 0xF0));
        assert_eq!(pink.saturation, 201);
        assert_eq!(pink.brightness, 184);
        assert_eq!(pink.hue, 54613);
    }

    #[test]
    fn test_decode_matches_encode() {
        let commands = [
            Command::SelectScene(Scene::CandleLight),
            Command::TopTemperature(2700),
            Command::ImmediateLight {
                top: Some(TopBlock::temperature(3000)),
                bottom: None,
            },
            Command::ImmediateLight {
                top: None,
                bottom: Some(BottomBlock { temperature: 4000, brightness: 255 }),
            },
        ];
        for command in commands {
            assert_eq!(Command::decode(&command.encode()), Ok(command));
        }
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(Command::decode(&[]), Err(ProtocolError::Truncated));
        assert_eq!(
            Command::decode(&[0xA1, 0x02, 0x05, 0x05]),
            Err(ProtocolError::InvalidPrefix(0xA1))
        );
        assert_eq!(
            Command::decode(&[0xA0, 0x02, 0x09]),
            Err(ProtocolError::UnknownCommand { group: 0x02, opcode: 0x09 })
        );
        assert_eq!(
            Command::decode(&[0xA0, 0x02, 0x05, 0x42]),
            Err(ProtocolError::UnknownScene(0x42))
        );
        assert_eq!(
            Command::decode(&[0xA0, 0x02, 0x05, 0x05, 0x00]),
            Err(ProtocolError::TrailingBytes(1))
        );
        assert_eq!(
            Command::decode(&[0xA0, 0x01, 0x02, 0x00, 0x00, 0x00]),
            Err(ProtocolError::InvalidContent(0x00))
        );
        assert_eq!(
            Command::decode(&[0xA0, 0x01, 0x02, 0x01, 0x00, 0x05, 0, 0, 0, 0]),
            Err(ProtocolError::UnsupportedDuration(5))
        );
        assert_eq!(
            Command::decode(&[0xA0, 0x01, 0x02, 0x03, 0x00, 0x00, 0x11, 0x22]),
            Err(ProtocolError::Truncated)
        );
    }
}
