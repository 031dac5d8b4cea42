//! Start menu and end-of-game screens.

use embedded_graphics::{
    prelude::{
        Point,
        Size,
    },
    primitives::Rectangle,
};

use crate::{
    error::Result,
    game::Outcome,
    hal::{
        Key,
        Keypad,
        Screen,
    },
};

const SCREEN: Rectangle = Rectangle::new(Point::zero(), Size::new(320, 170));

/// What the player picked on the start menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Choice {
    Play,
    Quit,
}

impl Choice {
    /// Map a key read to a menu choice. A failed read counts as quitting;
    /// keys the menu does not use are ignored.
    pub fn from_read(read: Result<Key>) -> Option<Self> {
        match read {
            Ok(Key::Play) => Some(Self::Play),
            Ok(Key::Quit) | Err(_) => Some(Self::Quit),
            Ok(Key::Left | Key::Right | Key::Other) => None,
        }
    }
}

/// Check the keypad once for a menu choice.
pub fn poll(keypad: &mut impl Keypad) -> Option<Choice> {
    if !keypad.is_pressed() {
        return None;
    }
    let choice = Choice::from_read(keypad.read_code());
    if let Some(choice) = choice {
        info!("menu: {:?}", choice);
    }
    choice
}

pub fn draw(screen: &mut impl Screen) {
    screen.clear_region(SCREEN);
    screen.draw_text(Point::new(20, 20), "MENU. OPTIONS:");
    screen.draw_text(Point::new(50, 70), "A. PLAY");
    screen.draw_text(Point::new(50, 100), "B. QUIT");

    info!("controls:");
    info!("  A       play");
    info!("  B       quit");
    info!("  LEFT    move firemen left");
    info!("  RIGHT   move firemen right");
    info!("  SELECT  pause music");
    info!("  START   resume music");
}

/// The one end-of-game screen.
pub fn draw_outcome(screen: &mut impl Screen, outcome: Outcome) {
    screen.clear_region(SCREEN);
    match outcome {
        Outcome::Won => {
            info!("game won");
            screen.draw_text(Point::new(20, 50), "YOU WIN!");
            screen.draw_text(Point::new(40, 80), "^ ^");
            screen.draw_text(Point::new(50, 100), ".");
        }
        Outcome::Lost => {
            info!("game lost");
            screen.draw_text(Point::new(20, 50), "YOU LOSE..");
            screen.draw_text(Point::new(40, 75), "x     x");
            screen.draw_text(Point::new(50, 100), " ___");
        }
    }
}

pub fn draw_farewell(screen: &mut impl Screen) {
    info!("leaving the game");
    screen.clear_region(SCREEN);
    screen.draw_text(Point::new(20, 50), "leaving..");
    screen.draw_text(Point::new(40, 90), "BYE BYE!");
}
