//! The participant registry: the ordered, owning list the wheel spins over.
//!
//! The registry is the single owner of participant state. The spin engine
//! only ever sees an immutable snapshot taken at spin time, and the
//! chosen-flag transition happens here, after the selection callback has
//! reported the pick -- never inside the selection core.

use fortuna_types::{Participant, ParticipantId};

/// Errors that can occur when mutating the registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A participant name was empty after trimming whitespace.
    #[error("participant name must not be empty")]
    EmptyName,

    /// No participant with the given ID exists.
    #[error("no participant with id {0}")]
    NotFound(ParticipantId),

    /// The participant was already chosen this round; the flag only
    /// transitions false to true once.
    #[error("participant {0} was already chosen this round")]
    AlreadyChosen(ParticipantId),
}

/// Ordered collection of wheel participants.
///
/// Order matters: the participant at index `i` owns sector `i` of the
/// wheel for the duration of a spin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantRegistry {
    participants: Vec<Participant>,
}

impl ParticipantRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            participants: Vec::new(),
        }
    }

    /// Restore a registry from previously persisted participants.
    pub const fn from_participants(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    /// Add a participant with the given display name, returning the new ID.
    ///
    /// The name is trimmed; a name that is empty after trimming is
    /// rejected with [`RegistryError::EmptyName`].
    pub fn add(&mut self, name: &str) -> Result<ParticipantId, RegistryError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let participant = Participant::new(trimmed);
        let id = participant.id;
        self.participants.push(participant);
        Ok(id)
    }

    /// Change a participant's display name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the ID is unknown, or
    /// [`RegistryError::EmptyName`] if the new name trims to nothing.
    pub fn rename(&mut self, id: ParticipantId, name: &str) -> Result<(), RegistryError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let participant = self.get_mut(id)?;
        participant.name = trimmed.to_owned();
        Ok(())
    }

    /// Remove a participant, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the ID is unknown.
    pub fn remove(&mut self, id: ParticipantId) -> Result<Participant, RegistryError> {
        let position = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        Ok(self.participants.remove(position))
    }

    /// Mark a participant as chosen for this round.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the ID is unknown, or
    /// [`RegistryError::AlreadyChosen`] if the flag was already set --
    /// chosen-ness transitions false to true exactly once per round.
    pub fn mark_chosen(&mut self, id: ParticipantId) -> Result<(), RegistryError> {
        let participant = self.get_mut(id)?;
        if participant.chosen {
            return Err(RegistryError::AlreadyChosen(id));
        }
        participant.chosen = true;
        Ok(())
    }

    /// Start a new round: reset every participant's chosen flag.
    pub fn reset_all(&mut self) {
        for participant in &mut self.participants {
            participant.chosen = false;
        }
    }

    /// Remove every participant.
    pub fn clear(&mut self) {
        self.participants.clear();
    }

    /// Return the ordered participant list.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Take an owned ordered snapshot for one spin. The snapshot fixes
    /// the sector-to-participant mapping even if the registry changes
    /// before the spin settles.
    pub fn snapshot(&self) -> Vec<Participant> {
        self.participants.clone()
    }

    /// Number of participants on the wheel.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether the registry holds no participants.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Number of participants that have not been chosen this round.
    pub fn eligible_count(&self) -> usize {
        self.participants.iter().filter(|p| !p.chosen).count()
    }

    /// Whether a spin may start: at least two participants, at least one
    /// of them still eligible.
    pub fn can_spin(&self) -> bool {
        self.len() >= 2 && self.eligible_count() > 0
    }

    fn get_mut(&mut self, id: ParticipantId) -> Result<&mut Participant, RegistryError> {
        self.participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RegistryError::NotFound(id))
    }
}
