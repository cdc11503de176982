//! Property tests: arbitrary input sequences never break the game rules

use proptest::prelude::*;

use sky_ace::Settings;
use sky_ace::consts::*;
use sky_ace::settings::QualityPreset;
use sky_ace::sim::{
    Bullet, GameData, GameEvent, GamePhase, Hitbox, PowerUp, PowerUpKind, SimContext, TickInput,
    TouchDrag, tick,
};

fn decode(bits: u16, touch: (f32, f32)) -> TickInput {
    TickInput {
        move_up: bits & 1 != 0,
        move_down: bits & 2 != 0,
        move_left: bits & 4 != 0,
        move_right: bits & 8 != 0,
        shoot_held: bits & 16 != 0,
        // Rarer edges
        bomb_triggered: bits & 0x1e0 == 0x1e0,
        pause_toggled: bits & 0x3e00 == 0x3e00,
        menu_confirm: bits & 0x4000 != 0,
        restart_confirm: false,
        touch_drag: (bits & 0x8000 != 0).then(|| TouchDrag {
            start: glam::Vec2::new(210.0, 500.0),
            current: glam::Vec2::new(touch.0, touch.1),
        }),
    }
}

fn start(seed: u64, quality: QualityPreset) -> (GameData, SimContext) {
    let settings = Settings {
        quality,
        auto_shoot: false,
        ..Settings::default()
    };
    let mut ctx = SimContext::new(seed, settings);
    let mut game = ctx.new_game(0);
    game.state = GamePhase::Playing;
    (game, ctx)
}

#[test]
fn fatal_hit_ends_run_despite_life_pickup() {
    let (mut game, mut ctx) = start(37, QualityPreset::Medium);
    game.player.lives = 1;
    game.player.invincible = 0;
    let at = game.player.pos + glam::Vec2::new(15.0, 15.0);
    game.bullets.push(Bullet::enemy(at, 6.0, glam::Vec2::ZERO));
    let mut life = PowerUp::dropped_at(game.player.center(), PowerUpKind::Life);
    life.vy = 0.0;
    game.power_ups.push(life);

    let events = tick(&mut game, &mut TickInput::default(), &mut ctx);
    assert_eq!(game.state, GamePhase::GameOver);
    assert_eq!(game.player.lives, 0);
    assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

    // Nothing revives a finished run
    let events = tick(&mut game, &mut TickInput::default(), &mut ctx);
    assert!(events.is_empty());
    assert_eq!(game.player.lives, 0);
}

fn quality() -> impl Strategy<Value = QualityPreset> {
    prop_oneof![
        Just(QualityPreset::Low),
        Just(QualityPreset::Medium),
        Just(QualityPreset::High),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn stats_stay_in_bounds(
        seed in any::<u64>(),
        quality in quality(),
        frames in prop::collection::vec((any::<u16>(), (0.0f32..420.0, 0.0f32..680.0)), 1..900),
    ) {
        let (mut game, mut ctx) = start(seed, quality);
        let cap = ctx.settings.max_particles();
        let mut last_score = 0;
        let mut last_wave = 0;
        let mut game_overs = 0;

        for (bits, touch) in frames {
            let mut input = decode(bits, touch);
            let events = tick(&mut game, &mut input, &mut ctx);
            game_overs += events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count();

            let p = &game.player;
            prop_assert!(p.lives <= MAX_LIVES);
            prop_assert!(p.bombs <= MAX_BOMBS);
            prop_assert!((1..=MAX_FIREPOWER).contains(&p.firepower));
            prop_assert!(p.pos.x >= 0.0 && p.pos.x <= PLAYFIELD_WIDTH - p.size.x);
            prop_assert!(p.pos.y >= HUD_HEIGHT && p.pos.y <= PLAYFIELD_HEIGHT - p.size.y);
            prop_assert!(p.invincible <= INVINCIBILITY_FRAMES);

            prop_assert!(p.score >= last_score);
            prop_assert!(game.wave >= last_wave);
            prop_assert!(game.high_score >= p.score);
            last_score = p.score;
            last_wave = game.wave;

            prop_assert!(game.particles.len() <= cap);
            prop_assert!(game.particles.iter().all(|pt| pt.life > 0.0));
            prop_assert!(game.enemies.iter().all(|e| e.health > 0.0));
            prop_assert!(game.bomb_active <= BOMB_DURATION);

            if game.state == GamePhase::GameOver {
                prop_assert_eq!(p.lives, 0);
            }
        }

        prop_assert!(game_overs <= 1);
    }

    #[test]
    fn game_over_is_terminal(seed in any::<u64>(), frames in 1usize..200) {
        let (mut game, mut ctx) = start(seed, QualityPreset::Medium);
        game.state = GamePhase::GameOver;
        game.player.lives = 0;
        let before = game.clone();
        for _ in 0..frames {
            let mut input = TickInput {
                shoot_held: true,
                move_left: true,
                bomb_triggered: true,
                pause_toggled: true,
                ..Default::default()
            };
            prop_assert!(tick(&mut game, &mut input, &mut ctx).is_empty());
        }
        prop_assert_eq!(game, before);
    }

    #[test]
    fn replay_is_deterministic(
        seed in any::<u64>(),
        frames in prop::collection::vec((any::<u16>(), (0.0f32..420.0, 0.0f32..680.0)), 1..400),
    ) {
        let (mut a, mut ctx_a) = start(seed, QualityPreset::Low);
        let (mut b, mut ctx_b) = start(seed, QualityPreset::Low);
        for (bits, touch) in frames {
            let mut input_a = decode(bits, touch);
            let mut input_b = input_a.clone();
            let ev_a = tick(&mut a, &mut input_a, &mut ctx_a);
            let ev_b = tick(&mut b, &mut input_b, &mut ctx_b);
            prop_assert_eq!(ev_a, ev_b);
        }
        prop_assert_eq!(a, b);
    }
}
