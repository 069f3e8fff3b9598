// Sound cues. Playback is best effort: failures are logged and forgotten.
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

use super::session::GameEvent;
use crate::GameConfig;

/// What the mixer wants the speakers to do in response to game events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Explosion,
    StartMusic,
    StopMusic,
}

/// Map events to cues, honouring the mute flag. Stopping music is never muted.
pub fn cues_for(events: &[GameEvent], muted: bool) -> Vec<Cue> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Destroyed { .. } if !muted => Some(Cue::Explosion),
            GameEvent::Started if !muted => Some(Cue::StartMusic),
            GameEvent::GameOver(_) | GameEvent::ReturnedToMenu => Some(Cue::StopMusic),
            _ => None,
        })
        .collect()
}

struct Tracks {
    explosion: HtmlAudioElement,
    music: HtmlAudioElement,
    on_reject: Closure<dyn FnMut(JsValue)>,
}

/// Owns the audio elements and the mute flag.
pub struct Mixer {
    muted: bool,
    tracks: Option<Tracks>,
}

impl Mixer {
    /// Build the audio elements. Without them (no DOM, unsupported codec)
    /// the mixer stays silent.
    pub fn new(config: &GameConfig) -> Self {
        let tracks = match load_tracks(config) {
            Ok(tracks) => Some(tracks),
            Err(err) => {
                warn!("audio disabled: {err:?}");
                None
            }
        };
        Self {
            muted: false,
            tracks,
        }
    }

    pub fn silent() -> Self {
        Self {
            muted: false,
            tracks: None,
        }
    }

    /// Swap in tracks for new sources, stopping the old music first. The mute
    /// flag carries over.
    pub fn reload(&mut self, config: &GameConfig) {
        self.apply(Cue::StopMusic);
        let muted = self.muted;
        *self = Self::new(config);
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Muting pauses the music; unmuting resumes it if a run is in progress.
    pub fn set_muted(&mut self, muted: bool, playing: bool) {
        self.muted = muted;
        if muted {
            self.apply(Cue::StopMusic);
        } else if playing {
            self.apply(Cue::StartMusic);
        }
    }

    pub fn react(&mut self, events: &[GameEvent]) {
        for cue in cues_for(events, self.muted) {
            self.apply(cue);
        }
    }

    fn apply(&mut self, cue: Cue) {
        let Some(tracks) = &self.tracks else {
            return;
        };
        match cue {
            Cue::Explosion => {
                tracks.explosion.set_current_time(0.0);
                play(&tracks.explosion, &tracks.on_reject);
            }
            Cue::StartMusic => play(&tracks.music, &tracks.on_reject),
            Cue::StopMusic => {
                tracks.music.pause().ok();
            }
        }
    }
}

fn load_tracks(config: &GameConfig) -> Result<Tracks, JsValue> {
    let explosion = HtmlAudioElement::new_with_src(&config.explosion_src)?;
    let music = HtmlAudioElement::new_with_src(&config.music_src)?;
    music.set_loop(true);
    music.set_volume(config.music_volume.clamp(0.0, 1.0));
    let on_reject = Closure::wrap(Box::new(|err: JsValue| {
        warn!("audio play failed: {err:?}");
    }) as Box<dyn FnMut(JsValue)>);
    Ok(Tracks {
        explosion,
        music,
        on_reject,
    })
}

fn play(el: &HtmlAudioElement, on_reject: &Closure<dyn FnMut(JsValue)>) {
    match el.play() {
        Ok(promise) => {
            let _ = promise.catch(on_reject);
        }
        Err(err) => warn!("audio play failed: {err:?}"),
    }
}
