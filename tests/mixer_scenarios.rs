use studyflow_ambient::{
    config::{AudioPreset, EngineConfig},
    mixer::{MixSnapshot, Mixer},
    system::AudioSystem,
    visualizer::VisualizerState,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn render(mixer: &mut Mixer, secs: f32) -> Vec<f32> {
    let mut out = vec![0.0; (secs * SAMPLE_RATE) as usize];
    mixer.render_block(&mut out);
    out
}

fn rms(buf: &[f32]) -> f32 {
    (buf.iter().map(|s| s * s).sum::<f32>() / buf.len() as f32).sqrt()
}

#[test]
fn master_mute_fades_out_without_stopping() {
    let mut mixer = Mixer::new(EngineConfig::default().seeded(4), SAMPLE_RATE);
    mixer.set_volume("rain", 0.4);
    assert!(mixer.has_active_sounds());

    let loud = render(&mut mixer, 0.5);
    mixer.set_master_volume(0.0);
    let fading = render(&mut mixer, 0.1);
    let quiet = render(&mut mixer, 0.5);

    assert!(rms(&loud[12_000..]) > 0.0);
    assert!(rms(&fading) < rms(&loud[12_000..]));
    assert_eq!(rms(&quiet), 0.0);
    assert!(mixer.is_playing("rain"));
}

#[test]
fn preset_switch_from_forest_to_rain_and_cafe() {
    let mut mixer = Mixer::new(EngineConfig::default().seeded(5), SAMPLE_RATE);
    mixer.set_volume("forest", 0.5);
    render(&mut mixer, 1.0);

    mixer.load_preset(&AudioPreset::new(&["rain", "cafe"], &[30.0, 10.0], false));
    render(&mut mixer, 0.5);

    let active: Vec<&str> = mixer.sound_names().filter(|n| mixer.is_playing(n)).collect();
    assert_eq!(active, vec!["cafe", "rain"]);
    assert_eq!(mixer.pending_modulations("forest"), 0);
    assert_eq!(mixer.active_sources("forest"), 0);
    assert!((mixer.volume("rain") - 0.3).abs() < 1e-6);
    assert!((mixer.volume("cafe") - 0.1).abs() < 1e-6);
}

#[test]
fn hundred_toggles_while_rendering() {
    let mut mixer = Mixer::new(EngineConfig::default().seeded(6), SAMPLE_RATE);
    for _ in 0..100 {
        mixer.toggle_sound("ocean");
        render(&mut mixer, 0.01);
        let sources = mixer.active_sources("ocean");
        assert!(sources <= 1);
        assert!(mixer.pending_modulations("ocean") <= 1);
    }
    assert!(!mixer.is_playing("ocean"));
    assert_eq!(mixer.pending_modulations("ocean"), 0);
}

#[test]
fn settings_survive_a_json_round_trip_through_the_system() {
    let mixer = Mixer::new(EngineConfig::default().seeded(7), SAMPLE_RATE);
    let mut system = AudioSystem::offline(mixer);
    system.load_named_preset("nature-study");
    let saved = system.snapshot().unwrap().to_json().unwrap();
    system.close();

    let mut fresh = AudioSystem::offline(Mixer::new(EngineConfig::default().seeded(8), SAMPLE_RATE));
    fresh.restore(&MixSnapshot::from_json(&saved).unwrap());
    assert!(fresh.is_playing("rain"));
    assert!(fresh.is_playing("forest"));
    assert!((fresh.volume("forest") - 0.2).abs() < 1e-6);
}

#[test]
fn visualizer_sees_sound_and_silence() {
    let mut mixer = Mixer::new(EngineConfig::default().seeded(9), SAMPLE_RATE);
    let mut vis = VisualizerState::new();

    render(&mut mixer, 0.1);
    vis.refresh(mixer.analyser_mut());
    assert!(vis.bins().iter().all(|&b| b == 0));

    mixer.set_volume("brown_noise", 1.0);
    render(&mut mixer, 0.5);
    for _ in 0..10 {
        vis.refresh(mixer.analyser_mut());
    }
    assert!(vis.bins()[..8].iter().any(|&b| b > 0), "low bins light up");
}

#[test]
fn config_file_sounds_are_playable() {
    let config = EngineConfig::from_toml_str(
        r#"
        seed = 10

        [sounds.drizzle]
        type = "noise"
        base_freq = 2000.0
        filter_freq = 800.0
        gain = 0.2

        [presets.light]
        sounds = ["drizzle"]
        volumes = [50]
        "#,
    )
    .unwrap();
    let mut mixer = Mixer::new(config, SAMPLE_RATE);

    assert!(mixer.load_named_preset("light"));
    let out = render(&mut mixer, 0.5);
    assert!(rms(&out[6_000..]) > 0.0);
    assert!((mixer.sound_gain("drizzle").unwrap() - 0.1).abs() < 1e-5);
}
