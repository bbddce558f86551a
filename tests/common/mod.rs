//! Shared wiring for integration tests: an in-memory backend with every
//! repository, probe, and pipeline assembled the way the production
//! composition root does it.

#![allow(dead_code)]

use fintrack_domain::*;
use std::sync::Arc;
use uuid::Uuid;

/// Fully wired in-memory backend
pub struct Backend {
    pub users: Arc<InMemoryRepository<User>>,
    pub accounts: Arc<InMemoryRepository<Account>>,
    pub categories: Arc<InMemoryRepository<Category>>,
    pub concepts: Arc<InMemoryRepository<Concept>>,
    pub clients: Arc<InMemoryRepository<Client>>,
    pub payees: Arc<InMemoryRepository<Payee>>,
    pub persons: Arc<InMemoryRepository<Person>>,
    pub payment_methods: Arc<InMemoryRepository<PaymentMethod>>,
    pub expenses: Arc<InMemoryRepository<Expense>>,
    pub incomes: Arc<InMemoryRepository<Income>>,
    pub transfers: Arc<InMemoryRepository<Transfer>>,
    pub cache: Arc<InMemoryCache>,
    pub unit_of_work: Arc<InMemoryUnitOfWork>,
    pub validator: Arc<DomainValidator>,
    pub dispatcher: Arc<EventDispatcher>,
}

impl Backend {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryRepository::<User>::new());
        let accounts = Arc::new(InMemoryRepository::<Account>::new());
        let categories = Arc::new(InMemoryRepository::<Category>::new());
        let concepts = Arc::new(InMemoryRepository::<Concept>::new());
        let clients = Arc::new(InMemoryRepository::<Client>::new());
        let payees = Arc::new(InMemoryRepository::<Payee>::new());
        let persons = Arc::new(InMemoryRepository::<Person>::new());
        let payment_methods = Arc::new(InMemoryRepository::<PaymentMethod>::new());
        let expenses = Arc::new(InMemoryRepository::<Expense>::new());
        let incomes = Arc::new(InMemoryRepository::<Income>::new());
        let transfers = Arc::new(InMemoryRepository::<Transfer>::new());

        let cache = Arc::new(InMemoryCache::default());
        let unit_of_work = Arc::new(InMemoryUnitOfWork::new());

        let dispatcher = Arc::new(EventDispatcher::new().with_handler(Arc::new(
            BalanceUpdateHandler::new(accounts.clone(), cache.clone()),
        )));

        let mut validator = DomainValidator::new();
        validator.register("User", Arc::new(RepositoryProbe::new(users.clone())));
        validator.register("Account", Arc::new(RepositoryProbe::new(accounts.clone())));
        validator.register("Concept", Arc::new(RepositoryProbe::new(concepts.clone())));
        validator.register(
            "Category",
            Arc::new(NamedRepositoryProbe::new(categories.clone())),
        );
        validator.register(
            "Client",
            Arc::new(NamedRepositoryProbe::new(clients.clone())),
        );
        validator.register("Payee", Arc::new(NamedRepositoryProbe::new(payees.clone())));
        validator.register(
            "Person",
            Arc::new(NamedRepositoryProbe::new(persons.clone())),
        );
        validator.register(
            "PaymentMethod",
            Arc::new(NamedRepositoryProbe::new(payment_methods.clone())),
        );

        Self {
            users,
            accounts,
            categories,
            concepts,
            clients,
            payees,
            persons,
            payment_methods,
            expenses,
            incomes,
            transfers,
            cache,
            unit_of_work,
            validator: Arc::new(validator),
            dispatcher,
        }
    }

    fn commands<A>(&self, repository: Arc<InMemoryRepository<A>>) -> CommandPipeline<A>
    where
        A: AggregateRoot + EntityName + EventSource + Clone + 'static,
        InMemoryRepository<A>: WriteRepository<A>,
    {
        CommandPipeline::new(
            repository,
            self.validator.clone(),
            self.cache.clone(),
            self.dispatcher.clone(),
            self.unit_of_work.clone(),
        )
    }

    pub fn user_commands(&self) -> CommandPipeline<User> {
        self.commands(self.users.clone())
    }

    pub fn account_commands(&self) -> CommandPipeline<Account> {
        self.commands(self.accounts.clone())
    }

    pub fn category_commands(&self) -> CommandPipeline<Category> {
        self.commands(self.categories.clone())
    }

    pub fn concept_commands(&self) -> CommandPipeline<Concept> {
        self.commands(self.concepts.clone())
    }

    pub fn client_commands(&self) -> CommandPipeline<Client> {
        self.commands(self.clients.clone())
    }

    pub fn payee_commands(&self) -> CommandPipeline<Payee> {
        self.commands(self.payees.clone())
    }

    pub fn person_commands(&self) -> CommandPipeline<Person> {
        self.commands(self.persons.clone())
    }

    pub fn payment_method_commands(&self) -> CommandPipeline<PaymentMethod> {
        self.commands(self.payment_methods.clone())
    }

    pub fn expense_commands(&self) -> CommandPipeline<Expense> {
        self.commands(self.expenses.clone())
    }

    pub fn income_commands(&self) -> CommandPipeline<Income> {
        self.commands(self.incomes.clone())
    }

    pub fn transfer_commands(&self) -> CommandPipeline<Transfer> {
        self.commands(self.transfers.clone())
    }

    pub fn account_queries(&self) -> QueryPipeline<AccountView> {
        QueryPipeline::new(
            Arc::new(ProjectingReadModel::new(self.accounts.clone(), project_account)),
            self.cache.clone(),
        )
    }

    pub fn category_queries(&self) -> QueryPipeline<CategoryView> {
        QueryPipeline::new(
            Arc::new(ProjectingReadModel::new(self.categories.clone(), project_category)),
            self.cache.clone(),
        )
    }

    pub fn expense_queries(&self) -> QueryPipeline<ExpenseView> {
        QueryPipeline::new(
            Arc::new(ProjectingReadModel::new(self.expenses.clone(), project_expense)),
            self.cache.clone(),
        )
    }

    pub fn income_queries(&self) -> QueryPipeline<IncomeView> {
        QueryPipeline::new(
            Arc::new(ProjectingReadModel::new(self.incomes.clone(), project_income)),
            self.cache.clone(),
        )
    }

    /// Register a user and return their id
    pub async fn seed_user(&self) -> Uuid {
        let id = self
            .user_commands()
            .create(
                self.envelope(CreateUser {
                    name: "Test User".into(),
                    email: "test@example.com".into(),
                }),
                &user_create_spec(),
            )
            .await
            .unwrap();
        *id.as_uuid()
    }

    /// Create an account for a user and return its id
    pub async fn seed_account(&self, owner_id: Uuid, name: &str, balance: rust_decimal::Decimal) -> Uuid {
        let id = self
            .account_commands()
            .create(
                self.envelope(CreateAccount {
                    owner_id,
                    name: name.into(),
                    initial_balance: balance,
                }),
                &account_create_spec(),
            )
            .await
            .unwrap();
        *id.as_uuid()
    }

    /// Seed the full reference set an expense/income needs
    pub async fn seed_refs(&self, owner_id: Uuid) -> Refs {
        let category_id = self
            .category_commands()
            .create(
                self.envelope(CreateCategory {
                    owner_id,
                    name: "General".into(),
                    description: None,
                }),
                &category_create_spec(),
            )
            .await
            .unwrap();
        let concept_id = self
            .concept_commands()
            .create(
                self.envelope(CreateConcept {
                    owner_id,
                    name: "Misc".into(),
                    category_id: *category_id.as_uuid(),
                }),
                &concept_create_spec(),
            )
            .await
            .unwrap();
        let client_id = self
            .client_commands()
            .create(
                self.envelope(CreateClient {
                    owner_id,
                    name: "Acme Corp".into(),
                }),
                &client_create_spec(),
            )
            .await
            .unwrap();
        let payee_id = self
            .payee_commands()
            .create(
                self.envelope(CreatePayee {
                    owner_id,
                    name: "Corner Shop".into(),
                }),
                &payee_create_spec(),
            )
            .await
            .unwrap();
        let person_id = self
            .person_commands()
            .create(
                self.envelope(CreatePerson {
                    owner_id,
                    name: "Me".into(),
                }),
                &person_create_spec(),
            )
            .await
            .unwrap();
        let payment_method_id = self
            .payment_method_commands()
            .create(
                self.envelope(CreatePaymentMethod {
                    owner_id,
                    name: "Card".into(),
                }),
                &payment_method_create_spec(),
            )
            .await
            .unwrap();

        Refs {
            category_id: *category_id.as_uuid(),
            concept_id: *concept_id.as_uuid(),
            client_id: *client_id.as_uuid(),
            payee_id: *payee_id.as_uuid(),
            person_id: *person_id.as_uuid(),
            payment_method_id: *payment_method_id.as_uuid(),
        }
    }

    /// Wrap a command in an envelope issued by an arbitrary user
    pub fn envelope<C: Command>(&self, command: C) -> CommandEnvelope<C> {
        CommandEnvelope::new(command, UserId::new())
    }

    /// Wrap a query in an envelope issued by an arbitrary user
    pub fn query<Q: Query>(&self, query: Q) -> QueryEnvelope<Q> {
        QueryEnvelope::new(query, UserId::new())
    }
}

/// Reference ids shared by expense/income fixtures
pub struct Refs {
    pub category_id: Uuid,
    pub concept_id: Uuid,
    pub client_id: Uuid,
    pub payee_id: Uuid,
    pub person_id: Uuid,
    pub payment_method_id: Uuid,
}
