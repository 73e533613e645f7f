//! Keyboard handling shared by both display targets.
//!
//! Backend events (minifb keys, crossterm key codes) are first turned into a
//! backend-neutral [`Key`], then looked up in [`KeyBindings`] to get an
//! [`Action`] that is applied to the [`Scene`].

use std::ops::ControlFlow;

use crossterm::event::KeyCode;
use glam::{Mat4, Vec3};
use minifb::{KeyRepeat, Window};

use crate::{config::Config, core::Scene, util::format_mat4, util::format_vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Translate(Vec3),
    Scale(Vec3),
    /// Euler angles in radians
    Rotate(Vec3),
    Reset,
    OrbitCamera(f32),
    DumpDebug,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Special(SpecialKey),
}

impl Action {
    /// Whether holding the key keeps firing the action.
    pub fn repeats(&self) -> bool {
        matches!(
            self,
            Action::Translate(_) | Action::Scale(_) | Action::Rotate(_) | Action::OrbitCamera(_)
        )
    }

    pub fn apply(&self, scene: &mut Scene) -> ControlFlow<()> {
        match *self {
            Action::Translate(delta) => scene.cube.translate(delta),
            Action::Scale(factors) => scene.cube.scale(factors),
            Action::Rotate(angles) => scene.cube.rotate(angles),
            Action::Reset => {
                scene.cube.reset();
                scene.camera.reset();
                log::info!("Cube and camera reset");
            }
            Action::OrbitCamera(angle) => scene.camera.orbit(angle),
            Action::DumpDebug => {
                log::info!("{}", scene.cube);
                log::info!(
                    "Camera position: {} target: {} forward: {}",
                    format_vec3(scene.camera.position()),
                    format_vec3(scene.camera.target()),
                    format_vec3(scene.camera.forward()),
                );
                log::info!("\n{}", format_mat4("Camera View Matrix", &scene.camera.view_matrix()));
                log::info!(
                    "\n{}",
                    format_mat4("Camera Projection Matrix", &scene.camera.projection_matrix())
                );
                let model = Mat4::from_translation(scene.cube.center());
                let mvp = scene.camera.view_projection() * model;
                log::info!("\n{}", format_mat4("MVP matrix at cube center", &mvp));
            }
            Action::Quit => return ControlFlow::Break(()),
        }
        if self.repeats() {
            log::debug!("{:?} -> {}", self, scene.cube);
        }
        ControlFlow::Continue(())
    }
}

/// Step sizes for every bound key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyBindings {
    pub move_step: f32,
    pub scale_step: f32,
    /// Radians
    pub rotate_step: f32,
    /// Radians
    pub orbit_step: f32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl KeyBindings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            move_step: config.move_step,
            scale_step: config.scale_step,
            rotate_step: config.rotate_step(),
            orbit_step: config.rotate_step(),
        }
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        match key {
            Key::Char(c) => self.char_action(c),
            Key::Special(s) => Some(self.special_action(s)),
        }
    }

    fn char_action(&self, c: char) -> Option<Action> {
        let m = self.move_step;
        let r = self.rotate_step;
        let action = match c {
            '+' | '=' => Action::Scale(Vec3::splat(self.scale_step)),
            '-' | '_' => Action::Scale(Vec3::splat(1.0 / self.scale_step)),
            'x' => Action::Rotate(Vec3::new(r, 0.0, 0.0)),
            'X' => Action::Rotate(Vec3::new(-r, 0.0, 0.0)),
            'y' => Action::Rotate(Vec3::new(0.0, r, 0.0)),
            'Y' => Action::Rotate(Vec3::new(0.0, -r, 0.0)),
            'z' => Action::Rotate(Vec3::new(0.0, 0.0, r)),
            'Z' => Action::Rotate(Vec3::new(0.0, 0.0, -r)),
            'w' | 'W' => Action::Translate(Vec3::new(0.0, 0.0, -m)),
            's' | 'S' => Action::Translate(Vec3::new(0.0, 0.0, m)),
            'o' => Action::OrbitCamera(self.orbit_step),
            'O' => Action::OrbitCamera(-self.orbit_step),
            'r' | 'R' => Action::Reset,
            '/' | '?' => Action::DumpDebug,
            'q' | 'Q' => Action::Quit,
            _ => return None,
        };
        Some(action)
    }

    fn special_action(&self, key: SpecialKey) -> Action {
        let m = self.move_step;
        match key {
            SpecialKey::Left => Action::Translate(Vec3::new(-m, 0.0, 0.0)),
            SpecialKey::Right => Action::Translate(Vec3::new(m, 0.0, 0.0)),
            SpecialKey::Up => Action::Translate(Vec3::new(0.0, m, 0.0)),
            SpecialKey::Down => Action::Translate(Vec3::new(0.0, -m, 0.0)),
            SpecialKey::PageUp => Action::Translate(Vec3::new(0.0, 0.0, m)),
            SpecialKey::PageDown => Action::Translate(Vec3::new(0.0, 0.0, -m)),
            SpecialKey::Escape => Action::Quit,
        }
    }
}

pub fn key_from_crossterm(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Left => Key::Special(SpecialKey::Left),
        KeyCode::Right => Key::Special(SpecialKey::Right),
        KeyCode::Up => Key::Special(SpecialKey::Up),
        KeyCode::Down => Key::Special(SpecialKey::Down),
        KeyCode::PageUp => Key::Special(SpecialKey::PageUp),
        KeyCode::PageDown => Key::Special(SpecialKey::PageDown),
        KeyCode::Esc => Key::Special(SpecialKey::Escape),
        _ => return None,
    };
    Some(key)
}

/// minifb reports physical keys, so shift has to be folded in by hand (US layout).
pub fn key_from_minifb(key: minifb::Key, shift: bool) -> Option<Key> {
    use minifb::Key as K;

    let letter = |lower: char| {
        Key::Char(if shift {
            lower.to_ascii_uppercase()
        } else {
            lower
        })
    };

    let key = match key {
        K::W => letter('w'),
        K::S => letter('s'),
        K::X => letter('x'),
        K::Y => letter('y'),
        K::Z => letter('z'),
        K::O => letter('o'),
        K::R => letter('r'),
        K::Q => letter('q'),
        K::Equal if shift => Key::Char('+'),
        K::Equal => Key::Char('='),
        K::NumPadPlus => Key::Char('+'),
        K::Minus | K::NumPadMinus => Key::Char('-'),
        K::Slash => Key::Char('/'),
        K::Left => Key::Special(SpecialKey::Left),
        K::Right => Key::Special(SpecialKey::Right),
        K::Up => Key::Special(SpecialKey::Up),
        K::Down => Key::Special(SpecialKey::Down),
        K::PageUp => Key::Special(SpecialKey::PageUp),
        K::PageDown => Key::Special(SpecialKey::PageDown),
        K::Escape => Key::Special(SpecialKey::Escape),
        _ => return None,
    };
    Some(key)
}

/// Actions for this frame. Held transform keys repeat, one-shot keys fire once per press.
pub fn actions_from_minifb(window: &Window, bindings: &KeyBindings) -> Vec<Action> {
    let shift = window.is_key_down(minifb::Key::LeftShift)
        || window.is_key_down(minifb::Key::RightShift);
    let fresh = window.get_keys_pressed(KeyRepeat::No);

    window
        .get_keys_pressed(KeyRepeat::Yes)
        .into_iter()
        .filter_map(|k| {
            let action = bindings.action_for(key_from_minifb(k, shift)?)?;
            (action.repeats() || fresh.contains(&k)).then_some(action)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Scene;

    fn bindings() -> KeyBindings {
        KeyBindings {
            move_step: 5.0,
            scale_step: 2.0,
            rotate_step: 0.1,
            orbit_step: 0.1,
        }
    }

    #[test]
    fn arrows_translate_in_the_screen_plane() {
        let b = bindings();
        assert_eq!(
            b.action_for(Key::Special(SpecialKey::Right)),
            Some(Action::Translate(Vec3::new(5.0, 0.0, 0.0)))
        );
        assert_eq!(
            b.action_for(Key::Special(SpecialKey::Down)),
            Some(Action::Translate(Vec3::new(0.0, -5.0, 0.0)))
        );
        assert_eq!(
            b.action_for(Key::Special(SpecialKey::PageUp)),
            Some(Action::Translate(Vec3::new(0.0, 0.0, 5.0)))
        );
    }

    #[test]
    fn case_picks_rotation_direction() {
        let b = bindings();
        assert_eq!(b.action_for(Key::Char('y')), Some(Action::Rotate(Vec3::new(0.0, 0.1, 0.0))));
        assert_eq!(b.action_for(Key::Char('Y')), Some(Action::Rotate(Vec3::new(0.0, -0.1, 0.0))));
    }

    #[test]
    fn scale_keys_are_reciprocal() {
        let b = bindings();
        assert_eq!(b.action_for(Key::Char('+')), Some(Action::Scale(Vec3::splat(2.0))));
        assert_eq!(b.action_for(Key::Char('-')), Some(Action::Scale(Vec3::splat(0.5))));
    }

    #[test]
    fn unbound_keys_do_nothing() {
        assert_eq!(bindings().action_for(Key::Char('k')), None);
        assert_eq!(key_from_crossterm(KeyCode::F(1)), None);
        assert_eq!(key_from_minifb(minifb::Key::F1, false), None);
    }

    #[test]
    fn backends_agree() {
        use minifb::Key as Mk;
        let pairs = [
            (KeyCode::Char('X'), Mk::X, true),
            (KeyCode::Char('+'), Mk::Equal, true),
            (KeyCode::Esc, Mk::Escape, false),
            (KeyCode::PageDown, Mk::PageDown, false),
        ];
        for (code, key, shift) in pairs {
            assert_eq!(key_from_crossterm(code), key_from_minifb(key, shift));
        }
    }

    #[test]
    fn apply_mutates_the_cube() {
        let mut scene = Scene::default();
        let b = bindings();

        let flow = b.action_for(Key::Special(SpecialKey::Up)).unwrap().apply(&mut scene);
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(scene.cube.center(), Vec3::new(0.0, 5.0, 0.0));

        let _ = b.action_for(Key::Char('+')).unwrap().apply(&mut scene);
        assert_eq!(scene.cube.scale_factors(), Vec3::splat(2.0));

        let _ = b.action_for(Key::Char('r')).unwrap().apply(&mut scene);
        assert_eq!(scene.cube.center(), Vec3::ZERO);
        assert_eq!(scene.cube.scale_factors(), Vec3::ONE);
    }

    #[test]
    fn quit_breaks_the_loop() {
        let mut scene = Scene::default();
        assert_eq!(Action::Quit.apply(&mut scene), ControlFlow::Break(()));
        assert_eq!(Action::DumpDebug.apply(&mut scene), ControlFlow::Continue(()));
        assert!(!Action::Quit.repeats());
        assert!(Action::Rotate(Vec3::X).repeats());
    }
}
