//! Team formation engine
//!
//! Implements the invite/accept protocol: a prospective leader invites one
//! or two teammates, each registered receiver holds at most one pending
//! invite, unregistered emails get a signed deferred invite they can redeem
//! at registration, and member slots are claimed with atomic conditional
//! writes so concurrent accepts never overfill a team.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DomainConfig;
use crate::domain::invite::RequestRepository;
use crate::domain::team::{Team, TeamRepository, TeamRole};
use crate::domain::user::{validate_email, User, UserId, UserRepository};
use crate::domain::{DomainError, Notifier};
use crate::infrastructure::auth::TokenService;
use crate::infrastructure::mail::templates;

/// What happened to a single invite target
#[derive(Debug)]
pub enum TargetOutcome {
    /// Pending request recorded and invite email dispatched
    Invited,
    /// No account under that email; a deferred invite link was sent instead
    Deferred,
    /// Target excluded from this dispatch, with the advisory reason
    Skipped(DomainError),
}

impl TargetOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Invited | Self::Deferred)
    }
}

/// Per-target result of an invite dispatch
#[derive(Debug)]
pub struct InviteReceipt {
    pub email: String,
    pub outcome: TargetOutcome,
}

/// Result of an invite dispatch with at least one delivered target
#[derive(Debug)]
pub struct InviteDispatch {
    pub receipts: Vec<InviteReceipt>,
}

/// Receiver's decision on their pending invite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteAction {
    Accept,
    Reject,
}

/// Result of resolving a pending invite
#[derive(Debug)]
pub enum InviteOutcome {
    Accepted { team: Team },
    Rejected,
}

/// Minimal user projection for overview payloads
#[derive(Debug, Clone, Serialize)]
pub struct PersonSummary {
    pub name: String,
    pub email: String,
}

impl PersonSummary {
    fn of(user: &User) -> Self {
        Self {
            name: user.name().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Current team composition as shown to its members
#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub leader: PersonSummary,
    pub members: Vec<PersonSummary>,
    pub filled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipKind {
    Leader,
    Member,
    Solo,
}

/// Team-formation state of one user, attached to login and session
/// responses. A UI hint only; every operation re-checks the store.
#[derive(Debug, Serialize)]
pub struct TeamOverview {
    pub membership: MembershipKind,
    pub team: Option<TeamSummary>,
    /// Incoming pending invite, identified by its sender
    pub invite: Option<PersonSummary>,
    /// Emails of receivers this user has invited and who have not answered
    pub pending: Vec<String>,
    /// Same-program emails to suggest as teammates
    pub suggestions: Vec<String>,
}

/// Trait for team-formation operations
#[async_trait]
pub trait TeamFormationApi: Send + Sync {
    /// Dispatch invites to one or two target emails
    async fn send_invites(
        &self,
        sender: UserId,
        emails: Vec<String>,
    ) -> Result<InviteDispatch, DomainError>;

    /// Accept or reject the caller's single pending invite
    async fn process_invite(
        &self,
        receiver: UserId,
        action: InviteAction,
    ) -> Result<InviteOutcome, DomainError>;

    /// Redeem a deferred invite token on behalf of a freshly registered user
    async fn redeem_deferred_invite(&self, token: &str, user: &User)
        -> Result<Team, DomainError>;

    /// Team-formation state of a user for login/session payloads
    async fn overview(&self, user: &User) -> Result<TeamOverview, DomainError>;
}

/// Team formation service
pub struct TeamFormationService<U: UserRepository, T: TeamRepository, R: RequestRepository> {
    users: Arc<U>,
    teams: Arc<T>,
    requests: Arc<R>,
    notifier: Arc<dyn Notifier>,
    tokens: Arc<dyn TokenService>,
    domains: DomainConfig,
}

impl<U: UserRepository, T: TeamRepository, R: RequestRepository> TeamFormationService<U, T, R> {
    pub fn new(
        users: Arc<U>,
        teams: Arc<T>,
        requests: Arc<R>,
        notifier: Arc<dyn Notifier>,
        tokens: Arc<dyn TokenService>,
        domains: DomainConfig,
    ) -> Self {
        Self {
            users,
            teams,
            requests,
            notifier,
            tokens,
            domains,
        }
    }

    /// Check whether a user may send invites at all.
    /// Returns their team when they lead an unfilled one.
    /// Team standing is judged before any outstanding incoming invite.
    async fn can_send(&self, sender: &User) -> Result<Option<Team>, DomainError> {
        let team = match self.teams.find_containing(sender.id()).await? {
            None => None,
            Some(team) if team.is_leader(sender.id()) && !team.is_filled() => Some(team),
            Some(team) if team.is_leader(sender.id()) => {
                return Err(DomainError::not_authorized(
                    "Your team already has the maximum number of members",
                ))
            }
            Some(_) => {
                return Err(DomainError::not_authorized(
                    "Only a team leader can send invites",
                ))
            }
        };

        if self.requests.find_by_receiver(sender.id()).await?.is_some() {
            return Err(DomainError::PendingInviteExists);
        }

        Ok(team)
    }

    /// Per-candidate eligibility. Advisory: a failure excludes only this
    /// candidate from the dispatch.
    async fn can_receive(&self, sender: &User, candidate: &User) -> Result<(), DomainError> {
        if candidate.id() == sender.id() {
            return Err(DomainError::SelfInvite);
        }

        if candidate.program() != sender.program() {
            return Err(DomainError::program_mismatch(format!(
                "'{}' is registered for the {} program",
                candidate.email(),
                candidate.program()
            )));
        }

        if self.teams.find_containing(candidate.id()).await?.is_some() {
            return Err(DomainError::AlreadyTeamed);
        }

        if self
            .requests
            .find_by_receiver(candidate.id())
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyInvited);
        }

        Ok(())
    }

    /// Process one target email. Storage failures propagate; eligibility
    /// failures come back as a Skipped outcome.
    async fn invite_target(
        &self,
        sender: &User,
        email: &str,
    ) -> Result<TargetOutcome, DomainError> {
        if validate_email(email).is_err() {
            return Ok(TargetOutcome::Skipped(DomainError::validation(format!(
                "'{}' is not a valid email address",
                email
            ))));
        }

        if email == sender.email() {
            return Ok(TargetOutcome::Skipped(DomainError::SelfInvite));
        }

        let Some(candidate) = self.users.get_by_email(email).await? else {
            // Unregistered: no request row, only a signed link they can
            // redeem at registration
            let token = self.tokens.issue_deferred_invite(sender, email)?;
            let link = format!("{}/register?invite={}", self.domains.frontend, token);
            let mail = templates::team_invite(email, sender.name(), sender.email(), &link);

            if !self.notifier.send(mail).await {
                warn!(to = %email, "Deferred invite email could not be delivered");
            }

            info!(sender = %sender.id(), to = %email, "Deferred invite issued");

            return Ok(TargetOutcome::Deferred);
        };

        match self.can_receive(sender, &candidate).await {
            Ok(()) => {}
            Err(e @ (DomainError::Storage { .. } | DomainError::Internal { .. })) => {
                return Err(e)
            }
            Err(reason) => return Ok(TargetOutcome::Skipped(reason)),
        }

        // Being invited supersedes the candidate's own invitations
        let purged = self.requests.delete_by_sender(candidate.id()).await?;
        if purged > 0 {
            info!(
                candidate = %candidate.id(),
                purged = purged,
                "Superseded candidate's outgoing invites"
            );
        }

        match self.requests.create(sender.id(), candidate.id()).await {
            Ok(_) => {}
            // Lost an invite race for this receiver
            Err(DomainError::AlreadyInvited) => {
                return Ok(TargetOutcome::Skipped(DomainError::AlreadyInvited))
            }
            Err(e) => return Err(e),
        }

        let link = format!("{}/login", self.domains.frontend);
        let mail = templates::team_invite(candidate.email(), sender.name(), sender.email(), &link);

        if !self.notifier.send(mail).await {
            warn!(to = %candidate.email(), "Invite email could not be delivered");
        }

        info!(sender = %sender.id(), receiver = %candidate.id(), "Invite recorded");

        Ok(TargetOutcome::Invited)
    }

    /// Put `joiner` into the sender's team, creating the team if the sender
    /// has none yet. Slot claims are conditional writes; a failed claim
    /// re-reads and retries the next slot. Slots only ever fill, so the
    /// retry loop terminates.
    async fn join_sender_team(&self, sender: &User, joiner: &User) -> Result<Team, DomainError> {
        let mut team = match self.teams.find_containing(sender.id()).await? {
            Some(team) => {
                if !team.is_leader(sender.id()) {
                    return Err(DomainError::not_authorized(
                        "The inviter has since joined another team",
                    ));
                }
                team
            }
            None => match self
                .teams
                .create(sender.id(), joiner.id(), sender.program())
                .await
            {
                Ok(team) => {
                    info!(team = %team.id(), leader = %sender.id(), member = %joiner.id(), "Team created");
                    return Ok(team);
                }
                // Lost the creation race; the winner's row is there now
                Err(DomainError::Conflict { .. }) => self
                    .teams
                    .find_containing(sender.id())
                    .await?
                    .ok_or_else(|| {
                        DomainError::internal("Leader row vanished after creation conflict")
                    })?,
                Err(e) => return Err(e),
            },
        };

        loop {
            let Some(slot) = team.open_slot() else {
                return Err(DomainError::TeamFull);
            };

            if self
                .teams
                .assign_member_slot(team.id(), slot, joiner.id())
                .await?
            {
                info!(team = %team.id(), member = %joiner.id(), slot = ?slot, "Member slot assigned");

                return self
                    .teams
                    .find_containing(joiner.id())
                    .await?
                    .ok_or_else(|| DomainError::internal("Team not found after slot assignment"));
            }

            team = self
                .teams
                .find_containing(sender.id())
                .await?
                .ok_or_else(|| DomainError::internal("Team vanished during slot assignment"))?;
        }
    }
}

#[async_trait]
impl<U: UserRepository, T: TeamRepository, R: RequestRepository> TeamFormationApi
    for TeamFormationService<U, T, R>
{
    async fn send_invites(
        &self,
        sender: UserId,
        emails: Vec<String>,
    ) -> Result<InviteDispatch, DomainError> {
        if emails.is_empty() || emails.len() > 2 {
            return Err(DomainError::validation(
                "Invite one or two teammates at a time",
            ));
        }

        let sender = self
            .users
            .get(sender)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", sender)))?;

        self.can_send(&sender).await?;

        let mut receipts = Vec::with_capacity(emails.len());

        for raw in emails {
            let email = raw.trim().to_lowercase();
            let outcome = self.invite_target(&sender, &email).await?;
            receipts.push(InviteReceipt { email, outcome });
        }

        if !receipts.iter().any(|r| r.outcome.is_delivered()) {
            return Err(DomainError::NoValidReceivers);
        }

        Ok(InviteDispatch { receipts })
    }

    async fn process_invite(
        &self,
        receiver: UserId,
        action: InviteAction,
    ) -> Result<InviteOutcome, DomainError> {
        let request = self
            .requests
            .find_by_receiver(receiver)
            .await?
            .ok_or(DomainError::NoPendingInvite)?;

        // The request is consumed no matter how resolution ends. A false
        // return means a concurrent resolution got there first.
        if !self.requests.delete(request.id()).await? {
            return Err(DomainError::NoPendingInvite);
        }

        if action == InviteAction::Reject {
            info!(request = %request.id(), receiver = %receiver, "Invite rejected");
            return Ok(InviteOutcome::Rejected);
        }

        let receiver_user = self
            .users
            .get(receiver)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", receiver)))?;

        let sender_user = self
            .users
            .get(request.sender_id())
            .await?
            .ok_or_else(|| DomainError::not_found("The inviter's account no longer exists"))?;

        let team = self.join_sender_team(&sender_user, &receiver_user).await?;

        info!(request = %request.id(), team = %team.id(), "Invite accepted");

        Ok(InviteOutcome::Accepted { team })
    }

    async fn redeem_deferred_invite(
        &self,
        token: &str,
        user: &User,
    ) -> Result<Team, DomainError> {
        let claims = self.tokens.verify_deferred_invite(token)?;

        // The token names the invited address; anyone else holding it
        // cannot use it
        if !claims.email.eq_ignore_ascii_case(user.email()) {
            return Err(DomainError::InvalidToken);
        }

        let sender = self
            .users
            .get(claims.sender_user_id()?)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        if user.program() != claims.program || sender.program() != claims.program {
            return Err(DomainError::program_mismatch(format!(
                "The invite was for the {} program",
                claims.program
            )));
        }

        if self.teams.find_containing(user.id()).await?.is_some() {
            return Err(DomainError::AlreadyTeamed);
        }

        self.join_sender_team(&sender, user).await
    }

    async fn overview(&self, user: &User) -> Result<TeamOverview, DomainError> {
        let team = self.teams.find_containing(user.id()).await?;

        let membership = match team.as_ref().and_then(|t| t.role_of(user.id())) {
            Some(TeamRole::Leader) => MembershipKind::Leader,
            Some(TeamRole::Member) => MembershipKind::Member,
            None => MembershipKind::Solo,
        };

        let team_summary = match &team {
            Some(team) => {
                let leader = self
                    .users
                    .get(team.leader_id())
                    .await?
                    .ok_or_else(|| DomainError::internal("Team leader account missing"))?;

                let mut members = Vec::new();
                for member_id in [team.member1_id(), team.member2_id()].into_iter().flatten() {
                    match self.users.get(member_id).await? {
                        Some(member) => members.push(PersonSummary::of(&member)),
                        None => warn!(member = %member_id, "Team member account missing"),
                    }
                }

                Some(TeamSummary {
                    leader: PersonSummary::of(&leader),
                    members,
                    filled: team.is_filled(),
                })
            }
            None => None,
        };

        let invite = match self.requests.find_by_receiver(user.id()).await? {
            Some(request) => self
                .users
                .get(request.sender_id())
                .await?
                .map(|sender| PersonSummary::of(&sender)),
            None => None,
        };

        let mut pending = Vec::new();
        for request in self.requests.find_by_sender(user.id()).await? {
            if let Some(receiver) = self.users.get(request.receiver_id()).await? {
                pending.push(receiver.email().to_string());
            }
        }

        let suggestions = self
            .users
            .emails_in_program(user.program(), user.id())
            .await?;

        Ok(TeamOverview {
            membership,
            team: team_summary,
            invite,
            pending,
            suggestions,
        })
    }
}
