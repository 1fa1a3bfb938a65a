use crate::alerts::sink::{AlertSink, ThresholdAlert, TracingAlertSink};
use crate::core::error::{RegistryError, RegistryResult};
use crate::models::address::Address;
use crate::models::user::{BiometricToken, Role, User, UserProfile, UserView};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_FAILED_ATTEMPT_THRESHOLD: u32 = 3;

/// One day, in seconds
pub const DEFAULT_TRANSFER_WINDOW: u64 = 86_400;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrySettings {
    /// Initial owner, created as an active admin
    pub owner: Address,
    /// Reference enrolled for the initial owner. Without one the owner
    /// cannot verify.
    pub owner_biometric: Option<BiometricToken>,
    pub failed_attempt_threshold: u32,
    /// Deactivate the account on the call that reaches the threshold.
    /// The current owner is never locked out.
    pub lockout_on_threshold: bool,
    /// Seconds a proposed ownership transfer stays acceptable
    pub transfer_window: u64,
}

impl RegistrySettings {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            owner_biometric: None,
            failed_attempt_threshold: DEFAULT_FAILED_ATTEMPT_THRESHOLD,
            lockout_on_threshold: false,
            transfer_window: DEFAULT_TRANSFER_WINDOW,
        }
    }
}

/// Result of a biometric verification attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    pub matched: bool,
    pub failed_attempts: u32,
    pub alert: Option<ThresholdAlert>,
}

/// Ownership handover waiting for the proposed owner to accept
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OwnershipTransfer {
    pub proposed: Address,
    pub proposer: Address,
    /// Last timestamp at which the transfer can be accepted
    pub expiry: u64,
}

/// Role-based user table with biometric verification
///
/// Every operation is all-or-nothing: preconditions are checked before the
/// first write. Callers that share a registry across threads must serialize
/// access to the whole value (see `AppState`).
pub struct UserRegistry {
    users: HashMap<Address, User>,
    settings: RegistrySettings,
    owner: Address,
    paused: bool,
    pending_transfer: Option<OwnershipTransfer>,
    sink: Arc<dyn AlertSink>,
}

impl UserRegistry {
    /// New registry whose owner is an active admin. Alerts go to the log.
    pub fn new(settings: RegistrySettings) -> RegistryResult<Self> {
        Self::with_sink(settings, Arc::new(TracingAlertSink))
    }

    pub fn with_sink(settings: RegistrySettings, sink: Arc<dyn AlertSink>) -> RegistryResult<Self> {
        if settings.owner.is_zero() {
            return Err(RegistryError::InvalidOwner);
        }
        if settings.failed_attempt_threshold == 0 {
            return Err(RegistryError::InvalidThreshold);
        }
        if settings.transfer_window == 0 {
            return Err(RegistryError::InvalidTransferWindow);
        }
        if settings.owner_biometric.as_ref().is_some_and(BiometricToken::is_empty) {
            return Err(RegistryError::EmptyBiometric);
        }

        let owner = User::new(
            UserProfile {
                address: settings.owner,
                name: String::new(),
                role: Role::Admin,
                biometric_reference: settings.owner_biometric.clone().unwrap_or_default(),
                department: String::new(),
                employee_id: String::new(),
            },
            0,
        );

        let mut users = HashMap::new();
        users.insert(settings.owner, owner);

        info!(
            owner = %settings.owner,
            owner_enrolled = settings.owner_biometric.is_some(),
            failed_attempt_threshold = settings.failed_attempt_threshold,
            lockout_on_threshold = settings.lockout_on_threshold,
            transfer_window = settings.transfer_window,
            "User registry created"
        );

        Ok(Self {
            users,
            owner: settings.owner,
            settings,
            paused: false,
            pending_transfer: None,
            sink,
        })
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Current owner. Starts as the configured owner and changes only
    /// through an accepted transfer.
    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending_ownership_transfer(&self) -> Option<OwnershipTransfer> {
        self.pending_transfer
    }

    pub fn register_user(&mut self, caller: Address, profile: UserProfile, timestamp: u64) -> RegistryResult<()> {
        self.require_admin(caller)?;
        self.require_not_paused()?;

        let address = profile.address;
        if self.users.contains_key(&address) {
            warn!(caller = %caller, address = %address, "Registration of existing address rejected");
            return Err(RegistryError::AlreadyRegistered);
        }
        if profile.biometric_reference.is_empty() {
            return Err(RegistryError::EmptyBiometric);
        }
        // New addresses carry no history, so there is no timestamp to check

        let role = profile.role;
        self.users.insert(address, User::new(profile, timestamp));

        info!(
            caller = %caller,
            address = %address,
            role = %role,
            timestamp = timestamp,
            "User registered"
        );
        Ok(())
    }

    pub fn get_user_role(&self, address: Address) -> RegistryResult<Role> {
        self.get(address).map(|user| user.role)
    }

    pub fn is_user_active(&self, address: Address) -> RegistryResult<bool> {
        self.get(address).map(|user| user.is_active)
    }

    pub fn get_user(&self, address: Address) -> RegistryResult<UserView> {
        self.get(address).map(User::view)
    }

    pub fn get_failed_attempts(&self, address: Address) -> RegistryResult<u32> {
        self.get(address).map(|user| user.failed_attempts)
    }

    /// True only for registered, active admins
    pub fn is_admin(&self, address: Address) -> bool {
        self.users
            .get(&address)
            .map(|user| user.role == Role::Admin && user.is_active)
            .unwrap_or(false)
    }

    pub fn verify_biometric(
        &mut self,
        address: Address,
        presented: &BiometricToken,
        timestamp: u64,
    ) -> RegistryResult<Verification> {
        self.require_not_paused()?;

        let threshold = self.settings.failed_attempt_threshold;
        let lockout = self.settings.lockout_on_threshold && address != self.owner;

        let user = self.users.get_mut(&address).ok_or(RegistryError::NotFound)?;
        if !user.is_active {
            debug!(address = %address, "Verification against inactive account rejected");
            return Err(RegistryError::InactiveAccount);
        }
        if user.biometric_reference.is_empty() {
            debug!(address = %address, "Verification against account without a reference rejected");
            return Err(RegistryError::NotEnrolled);
        }
        check_timestamp(user, timestamp)?;

        user.last_action_timestamp = timestamp;

        if user.biometric_reference.matches(presented) {
            user.failed_attempts = 0;
            info!(address = %address, timestamp = timestamp, "Biometric verification matched");
            return Ok(Verification {
                matched: true,
                failed_attempts: 0,
                alert: None,
            });
        }

        user.failed_attempts = user.failed_attempts.saturating_add(1);
        let failed_attempts = user.failed_attempts;

        info!(
            address = %address,
            failed_attempts = failed_attempts,
            timestamp = timestamp,
            "Biometric verification mismatch"
        );

        let alert = if failed_attempts >= threshold {
            if lockout {
                user.is_active = false;
            }
            let alert = ThresholdAlert {
                address,
                failed_attempts,
                threshold,
                timestamp,
                locked_out: lockout,
            };
            self.sink.raise(&alert);
            Some(alert)
        } else {
            None
        };

        Ok(Verification {
            matched: false,
            failed_attempts,
            alert,
        })
    }

    /// Stays available while paused
    pub fn deactivate_user(&mut self, caller: Address, address: Address, timestamp: u64) -> RegistryResult<()> {
        self.require_admin(caller)?;
        self.set_active(caller, address, false, timestamp)
    }

    pub fn reactivate_user(&mut self, caller: Address, address: Address, timestamp: u64) -> RegistryResult<()> {
        self.require_admin(caller)?;
        self.require_not_paused()?;
        self.set_active(caller, address, true, timestamp)
    }

    pub fn set_user_role(&mut self, caller: Address, address: Address, role: Role, timestamp: u64) -> RegistryResult<()> {
        self.require_admin(caller)?;
        self.require_not_paused()?;
        let owner = self.owner;

        let user = self.users.get_mut(&address).ok_or(RegistryError::NotFound)?;
        if address == owner {
            warn!(caller = %caller, "Role change of owner rejected");
            return Err(RegistryError::OwnerProtected);
        }
        check_timestamp(user, timestamp)?;

        let previous = user.role;
        user.role = role;
        user.last_action_timestamp = timestamp;

        info!(
            caller = %caller,
            address = %address,
            previous = %previous,
            role = %role,
            timestamp = timestamp,
            "User role changed"
        );
        Ok(())
    }

    /// Freeze registration, verification, reactivation and role changes
    pub fn pause(&mut self, caller: Address) -> RegistryResult<()> {
        self.set_paused(caller, true)
    }

    pub fn unpause(&mut self, caller: Address) -> RegistryResult<()> {
        self.set_paused(caller, false)
    }

    /// Offer ownership to another active user. Replaces any pending offer.
    pub fn propose_ownership_transfer(
        &mut self,
        caller: Address,
        new_owner: Address,
        timestamp: u64,
    ) -> RegistryResult<OwnershipTransfer> {
        self.require_owner(caller)?;
        if new_owner == self.owner {
            return Err(RegistryError::InvalidTransfer);
        }
        if !self.get(new_owner)?.is_active {
            return Err(RegistryError::InactiveAccount);
        }

        let transfer = OwnershipTransfer {
            proposed: new_owner,
            proposer: caller,
            expiry: timestamp.saturating_add(self.settings.transfer_window),
        };
        let replaced = self.pending_transfer.replace(transfer).is_some();

        info!(
            proposer = %caller,
            proposed = %new_owner,
            expiry = transfer.expiry,
            replaced = replaced,
            "Ownership transfer proposed"
        );
        Ok(transfer)
    }

    /// The proposed owner takes over: they become an admin and the
    /// previous owner drops to a plain user.
    pub fn accept_ownership_transfer(&mut self, caller: Address, timestamp: u64) -> RegistryResult<()> {
        let transfer = self.pending_transfer.ok_or(RegistryError::NoPendingTransfer)?;
        if caller != transfer.proposed {
            warn!(caller = %caller, proposed = %transfer.proposed, "Ownership acceptance by wrong caller rejected");
            return Err(RegistryError::Unauthorized);
        }
        if timestamp > transfer.expiry {
            return Err(RegistryError::TransferExpired { expiry: transfer.expiry });
        }

        let previous = self.owner;
        let incoming = self.get(caller)?;
        if !incoming.is_active {
            return Err(RegistryError::InactiveAccount);
        }
        check_timestamp(incoming, timestamp)?;
        check_timestamp(self.get(previous)?, timestamp)?;

        for (address, role) in [(caller, Role::Admin), (previous, Role::User)] {
            if let Some(user) = self.users.get_mut(&address) {
                user.role = role;
                user.last_action_timestamp = timestamp;
            }
        }
        self.owner = caller;
        self.pending_transfer = None;

        info!(
            previous = %previous,
            owner = %caller,
            timestamp = timestamp,
            "Ownership transferred"
        );
        Ok(())
    }

    pub fn cancel_ownership_transfer(&mut self, caller: Address) -> RegistryResult<()> {
        self.require_admin(caller)?;
        let transfer = self.pending_transfer.ok_or(RegistryError::NoPendingTransfer)?;
        if caller != transfer.proposer {
            warn!(caller = %caller, proposer = %transfer.proposer, "Ownership transfer cancel by non-proposer rejected");
            return Err(RegistryError::Unauthorized);
        }

        self.pending_transfer = None;
        info!(proposer = %caller, proposed = %transfer.proposed, "Ownership transfer cancelled");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.users.values().filter(|user| user.is_active).count()
    }

    fn get(&self, address: Address) -> RegistryResult<&User> {
        self.users.get(&address).ok_or(RegistryError::NotFound)
    }

    fn require_admin(&self, caller: Address) -> RegistryResult<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            warn!(caller = %caller, "Admin operation rejected");
            Err(RegistryError::Unauthorized)
        }
    }

    fn require_owner(&self, caller: Address) -> RegistryResult<()> {
        if caller == self.owner {
            self.require_admin(caller)
        } else {
            warn!(caller = %caller, "Owner operation rejected");
            Err(RegistryError::Unauthorized)
        }
    }

    fn require_not_paused(&self) -> RegistryResult<()> {
        if self.paused {
            Err(RegistryError::Paused)
        } else {
            Ok(())
        }
    }

    fn set_paused(&mut self, caller: Address, paused: bool) -> RegistryResult<()> {
        self.require_admin(caller)?;

        let changed = self.paused != paused;
        self.paused = paused;

        info!(caller = %caller, paused = paused, changed = changed, "Registry pause state updated");
        Ok(())
    }

    /// Caller must already be checked
    fn set_active(&mut self, caller: Address, address: Address, active: bool, timestamp: u64) -> RegistryResult<()> {
        let user = self.users.get_mut(&address).ok_or(RegistryError::NotFound)?;
        check_timestamp(user, timestamp)?;

        let changed = user.is_active != active;
        user.is_active = active;
        user.last_action_timestamp = timestamp;

        info!(
            caller = %caller,
            address = %address,
            active = active,
            changed = changed,
            timestamp = timestamp,
            "User activation updated"
        );
        Ok(())
    }
}

fn check_timestamp(user: &User, timestamp: u64) -> RegistryResult<()> {
    if timestamp < user.last_action_timestamp {
        return Err(RegistryError::InvalidTimestamp {
            provided: timestamp,
            last: user.last_action_timestamp,
        });
    }
    Ok(())
}
